//! Tracing setup.
//!
//! Logs go to stderr so command output on stdout stays pipeable.
//! `RUST_LOG` overrides the configured level when set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::domain::models::LoggingConfig;

/// Build the env filter: `RUST_LOG` wins, the configured level is the
/// fallback.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber per the logging config.
pub fn init(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(&config.level));

    if config.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_is_the_fallback() {
        // No RUST_LOG in the test environment for this directive check
        let filter = env_filter("warn");
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(filter.to_string(), "warn");
        }
    }
}
