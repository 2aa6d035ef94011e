use std::env;
use std::path::PathBuf;

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Log directory override (default: platform data directory)
    pub custom_log_dir: Option<PathBuf>,

    /// Filter for console output
    pub console_log_level: String,

    /// Filter for the application log file (default: "debug")
    pub file_log_level: String,

    /// Write JSON access/application logs to disk (default: true)
    pub file_logging_enabled: bool,

    /// Log retention in days (default: 30)
    pub retention_days: u32,

    /// Maximum total log directory size in MB (default: 1000)
    pub max_total_size_mb: u64,

    /// Gzip rotated log files (default: true)
    pub compression_enabled: bool,

    /// Run the background cleanup task (default: true)
    pub enable_cleanup: bool,

    /// Requests slower than this are logged as warnings (default: 5000)
    pub slow_request_threshold_ms: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            custom_log_dir: None,
            console_log_level: "fintext=info,tower_http=warn".to_string(),
            file_log_level: "debug".to_string(),
            file_logging_enabled: true,
            retention_days: 30,
            max_total_size_mb: 1000,
            compression_enabled: true,
            enable_cleanup: true,
            slow_request_threshold_ms: 5000,
        }
    }
}

impl LogConfig {
    /// Load logging configuration from environment variables
    ///
    /// FINTEXT_LOG_DIR, RUST_LOG, FINTEXT_FILE_LOG_LEVEL, LOG_FILES_ENABLED,
    /// LOG_RETENTION_DAYS, LOG_MAX_TOTAL_SIZE_MB, LOG_COMPRESSION,
    /// LOG_ENABLE_CLEANUP, LOG_SLOW_REQUEST_THRESHOLD_MS. Unparseable values
    /// keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let flag = |key: &str| lookup(key).map(|v| v.trim().eq_ignore_ascii_case("true"));

        if let Some(dir) = lookup("FINTEXT_LOG_DIR").filter(|d| !d.trim().is_empty()) {
            config.custom_log_dir = Some(PathBuf::from(dir));
        }

        if let Some(level) = lookup("RUST_LOG") {
            config.console_log_level = level;
        }

        if let Some(level) = lookup("FINTEXT_FILE_LOG_LEVEL") {
            config.file_log_level = level;
        }

        if let Some(enabled) = flag("LOG_FILES_ENABLED") {
            config.file_logging_enabled = enabled;
        }

        if let Some(days) = lookup("LOG_RETENTION_DAYS").and_then(|v| v.parse().ok()) {
            config.retention_days = days;
        }

        if let Some(size) = lookup("LOG_MAX_TOTAL_SIZE_MB").and_then(|v| v.parse().ok()) {
            config.max_total_size_mb = size;
        }

        if let Some(enabled) = flag("LOG_COMPRESSION") {
            config.compression_enabled = enabled;
        }

        if let Some(enabled) = flag("LOG_ENABLE_CLEANUP") {
            config.enable_cleanup = enabled;
        }

        if let Some(ms) = lookup("LOG_SLOW_REQUEST_THRESHOLD_MS").and_then(|v| v.parse().ok()) {
            config.slow_request_threshold_ms = ms;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        LogConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.file_log_level, "debug");
        assert!(config.file_logging_enabled);
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.max_total_size_mb, 1000);
        assert!(config.compression_enabled);
        assert!(config.enable_cleanup);
    }

    #[test]
    fn test_from_lookup_defaults() {
        assert_eq!(from_vars(&[]), LogConfig::default());
    }

    #[test]
    fn test_from_lookup_custom_values() {
        let config = from_vars(&[
            ("FINTEXT_LOG_DIR", "/tmp/fintext-logs"),
            ("LOG_RETENTION_DAYS", "60"),
            ("LOG_COMPRESSION", "false"),
            ("LOG_SLOW_REQUEST_THRESHOLD_MS", "3000"),
            ("RUST_LOG", "debug"),
        ]);
        assert_eq!(
            config.custom_log_dir,
            Some(PathBuf::from("/tmp/fintext-logs"))
        );
        assert_eq!(config.retention_days, 60);
        assert!(!config.compression_enabled);
        assert_eq!(config.slow_request_threshold_ms, 3000);
        assert_eq!(config.console_log_level, "debug");
    }

    #[test]
    fn test_invalid_values_use_defaults() {
        let config = from_vars(&[
            ("LOG_RETENTION_DAYS", "not-a-number"),
            ("LOG_MAX_TOTAL_SIZE_MB", "-5"),
        ]);
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.max_total_size_mb, 1000);
    }
}
