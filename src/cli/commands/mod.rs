//! CLI command implementations.

pub mod init;
pub mod notifications;
pub mod period;
pub mod sweep;
pub mod track;
