//! Environment-driven service configuration
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::rate_limit::RateLimitConfig;
use crate::text_processing::RewriterOptions;

/// `RATE_LIMIT_MODE` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitSetting {
    /// Per key when API keys are configured, per IP otherwise
    Auto,
    PerKey,
    PerIp,
    Disabled,
}

impl RateLimitSetting {
    /// Unknown values fall back to `Auto`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "disabled" | "off" => RateLimitSetting::Disabled,
            "per-key" => RateLimitSetting::PerKey,
            "per-ip" => RateLimitSetting::PerIp,
            _ => RateLimitSetting::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub request_timeout: Duration,
    pub rate_limit: RateLimitSetting,
    /// Limits applied per API key
    pub authenticated_limits: RateLimitConfig,
    /// Limits applied per client IP
    pub unauthenticated_limits: RateLimitConfig,
    pub api_key_file: Option<PathBuf>,
    pub rewriter: RewriterOptions,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            rate_limit: RateLimitSetting::Auto,
            authenticated_limits: RateLimitConfig::default(),
            unauthenticated_limits: RateLimitConfig::unauthenticated(),
            api_key_file: None,
            rewriter: RewriterOptions::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - REQUEST_TIMEOUT_SECONDS: request timeout (default: 30)
    /// - RATE_LIMIT_MODE: auto, per-key, per-ip or disabled (default: auto)
    /// - RATE_LIMIT_AUTHENTICATED_PER_SECOND / _BURST_SIZE (default: 10 / 20)
    /// - RATE_LIMIT_UNAUTHENTICATED_PER_SECOND / _BURST_SIZE (default: 5 / 10)
    /// - RATE_LIMIT_PER_SECOND / RATE_LIMIT_BURST_SIZE: fallback for both
    /// - FINTEXT_API_KEY_FILE: API key file path
    /// - FINTEXT_ISO_SUFFIX_PASS: enable the ISO-suffixed amount rewrite (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServiceConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        let parsed_u32 = |key: &str, fallback: &str, default: u32| {
            lookup(key)
                .or_else(|| lookup(fallback))
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(default)
        };

        let request_timeout = parsed("REQUEST_TIMEOUT_SECONDS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let rate_limit = lookup("RATE_LIMIT_MODE")
            .map(|v| RateLimitSetting::parse(&v))
            .unwrap_or(RateLimitSetting::Auto);

        let authenticated_limits = RateLimitConfig {
            per_second: parsed_u32(
                "RATE_LIMIT_AUTHENTICATED_PER_SECOND",
                "RATE_LIMIT_PER_SECOND",
                defaults.authenticated_limits.per_second,
            ),
            burst_size: parsed_u32(
                "RATE_LIMIT_AUTHENTICATED_BURST_SIZE",
                "RATE_LIMIT_BURST_SIZE",
                defaults.authenticated_limits.burst_size,
            ),
        };

        let unauthenticated_limits = RateLimitConfig {
            per_second: parsed_u32(
                "RATE_LIMIT_UNAUTHENTICATED_PER_SECOND",
                "RATE_LIMIT_PER_SECOND",
                defaults.unauthenticated_limits.per_second,
            ),
            burst_size: parsed_u32(
                "RATE_LIMIT_UNAUTHENTICATED_BURST_SIZE",
                "RATE_LIMIT_BURST_SIZE",
                defaults.unauthenticated_limits.burst_size,
            ),
        };

        let api_key_file = lookup("FINTEXT_API_KEY_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let iso_suffix_pass = lookup("FINTEXT_ISO_SUFFIX_PASS")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            request_timeout,
            rate_limit,
            authenticated_limits,
            unauthenticated_limits,
            api_key_file,
            rewriter: RewriterOptions { iso_suffix_pass },
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServiceConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.rewriter.iso_suffix_pass);
    }

    #[test]
    fn test_request_timeout_custom_and_invalid() {
        assert_eq!(
            config_from(&[("REQUEST_TIMEOUT_SECONDS", "120")]).request_timeout,
            Duration::from_secs(120)
        );
        assert_eq!(
            config_from(&[("REQUEST_TIMEOUT_SECONDS", "invalid")]).request_timeout,
            Duration::from_secs(30)
        );
        assert_eq!(
            config_from(&[("REQUEST_TIMEOUT_SECONDS", "-1")]).request_timeout,
            Duration::from_secs(30)
        );
        assert_eq!(
            config_from(&[("REQUEST_TIMEOUT_SECONDS", "0")]).request_timeout,
            Duration::from_secs(0)
        );
    }

    #[test]
    fn test_rate_limit_mode_parsing() {
        assert_eq!(RateLimitSetting::parse("PER-KEY"), RateLimitSetting::PerKey);
        assert_eq!(RateLimitSetting::parse("per-ip"), RateLimitSetting::PerIp);
        assert_eq!(RateLimitSetting::parse("disabled"), RateLimitSetting::Disabled);
        assert_eq!(RateLimitSetting::parse("whatever"), RateLimitSetting::Auto);
    }

    #[test]
    fn test_rate_limit_values_with_shared_fallback() {
        let config = config_from(&[
            ("RATE_LIMIT_PER_SECOND", "7"),
            ("RATE_LIMIT_AUTHENTICATED_BURST_SIZE", "40"),
        ]);
        assert_eq!(config.authenticated_limits.per_second, 7);
        assert_eq!(config.authenticated_limits.burst_size, 40);
        assert_eq!(config.unauthenticated_limits.per_second, 7);
        assert_eq!(config.unauthenticated_limits.burst_size, 10);
    }

    #[test]
    fn test_iso_suffix_flag() {
        assert!(config_from(&[("FINTEXT_ISO_SUFFIX_PASS", "true")]).rewriter.iso_suffix_pass);
        assert!(config_from(&[("FINTEXT_ISO_SUFFIX_PASS", "1")]).rewriter.iso_suffix_pass);
        assert!(!config_from(&[("FINTEXT_ISO_SUFFIX_PASS", "nope")]).rewriter.iso_suffix_pass);
    }

    #[test]
    fn test_api_key_file() {
        let config = config_from(&[("FINTEXT_API_KEY_FILE", "/tmp/keys.txt")]);
        assert_eq!(config.api_key_file, Some(PathBuf::from("/tmp/keys.txt")));
        assert_eq!(config_from(&[("FINTEXT_API_KEY_FILE", " ")]).api_key_file, None);
    }
}
