use serde::{Deserialize, Serialize};

/// Main configuration structure for regimen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Auto-completion scheduler configuration
    #[serde(default)]
    pub scheduler: SchedulerSettings,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".regimen/regimen.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Auto-completion scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerSettings {
    /// Tick interval in seconds; each tick checks whether the daily sweep
    /// is due
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,

    /// Hour of day (UTC, 0-23) at which the daily sweep fires
    #[serde(default = "default_sweep_hour")]
    pub sweep_hour: u32,
}

const fn default_tick_interval_secs() -> u64 {
    60
}

const fn default_sweep_hour() -> u32 {
    2
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
            sweep_hour: default_sweep_hour(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database.path, ".regimen/regimen.db");
        assert_eq!(config.scheduler.tick_interval_secs, 60);
        assert_eq!(config.scheduler.sweep_hour, 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"scheduler": {"sweep_hour": 4}}"#).unwrap();
        assert_eq!(config.scheduler.sweep_hour, 4);
        assert_eq!(config.scheduler.tick_interval_secs, 60);
        assert_eq!(config.database.max_connections, 5);
    }
}
