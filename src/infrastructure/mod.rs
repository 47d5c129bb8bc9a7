//! Infrastructure layer: configuration, logging, and other external
//! concerns.

pub mod config;
pub mod logging;
