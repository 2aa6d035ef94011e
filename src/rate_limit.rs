use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RateLimitSetting;
use crate::utils::header_utils::{extract_api_key, extract_client_ip};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: String,
    error: String,
}

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests per second allowed
    pub per_second: u32,
    /// Burst size (max requests in a single burst)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 10,
            burst_size: 20,
        }
    }
}

impl RateLimitConfig {
    /// Stricter defaults for clients without an API key
    pub fn unauthenticated() -> Self {
        Self {
            per_second: 5,
            burst_size: 10,
        }
    }

    /// `burst_size` requests at once, refilled at `per_second`; zero values are raised to one
    fn quota(&self) -> Quota {
        let per_second = NonZeroU32::new(self.per_second).unwrap_or(NonZeroU32::MIN);
        let burst_size = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::per_second(per_second).allow_burst(burst_size)
    }
}

/// One direct governor limiter per identity string
#[derive(Clone)]
struct LimiterTable {
    limiters: Arc<DashMap<String, Arc<DirectLimiter>>>,
    config: RateLimitConfig,
    clock: DefaultClock,
}

impl LimiterTable {
    fn new(config: RateLimitConfig) -> Self {
        Self {
            limiters: Arc::new(DashMap::new()),
            config,
            clock: DefaultClock::default(),
        }
    }

    fn check(&self, identity: &str) -> Result<(), Duration> {
        let limiter = self
            .limiters
            .entry(identity.to_string())
            .or_insert_with(|| Arc::new(RateLimiter::direct(self.config.quota())))
            .clone();

        limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    fn len(&self) -> usize {
        self.limiters.len()
    }
}

/// Rate limiter that tracks limits per API key
#[derive(Clone)]
pub struct PerKeyRateLimiter {
    table: LimiterTable,
}

impl PerKeyRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            table: LimiterTable::new(config),
        }
    }

    /// Check if a request should be allowed for the given API key
    pub fn check_rate_limit(&self, api_key: &str) -> Result<(), Duration> {
        self.table.check(api_key)
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.table.config
    }

    /// Get the number of tracked API keys
    pub fn tracked_keys_count(&self) -> usize {
        self.table.len()
    }
}

/// Rate limiter that tracks limits per client IP address
#[derive(Clone)]
pub struct PerIpRateLimiter {
    table: LimiterTable,
}

impl PerIpRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            table: LimiterTable::new(config),
        }
    }

    pub fn check_rate_limit(&self, ip: &str) -> Result<(), Duration> {
        self.table.check(ip)
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.table.config
    }

    pub fn tracked_ips_count(&self) -> usize {
        self.table.len()
    }
}

/// Which identity requests are limited by
#[derive(Clone)]
pub enum RateLimiterMode {
    PerKey(PerKeyRateLimiter),
    PerIp(PerIpRateLimiter),
}

impl RateLimiterMode {
    /// Build the limiter for a `RATE_LIMIT_MODE` setting
    ///
    /// `Auto` limits per key when API keys are configured and per IP
    /// otherwise. `Disabled` yields no limiter.
    pub fn select(
        setting: RateLimitSetting,
        authenticated: &RateLimitConfig,
        unauthenticated: &RateLimitConfig,
        api_keys_enabled: bool,
    ) -> Option<Self> {
        let per_key = || RateLimiterMode::PerKey(PerKeyRateLimiter::new(authenticated.clone()));
        let per_ip = || RateLimiterMode::PerIp(PerIpRateLimiter::new(unauthenticated.clone()));

        match setting {
            RateLimitSetting::Disabled => None,
            RateLimitSetting::PerKey => Some(per_key()),
            RateLimitSetting::PerIp => Some(per_ip()),
            RateLimitSetting::Auto if api_keys_enabled => Some(per_key()),
            RateLimitSetting::Auto => Some(per_ip()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        match self {
            RateLimiterMode::PerKey(limiter) => limiter.config(),
            RateLimiterMode::PerIp(limiter) => limiter.config(),
        }
    }

    pub fn mode_description(&self) -> &'static str {
        match self {
            RateLimiterMode::PerKey(_) => "per API key",
            RateLimiterMode::PerIp(_) => "per IP address",
        }
    }

    /// Returns the identity that was checked, for logging
    fn check(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> (String, Result<(), Duration>) {
        match self {
            RateLimiterMode::PerKey(limiter) => {
                // Unauthenticated requests share one bucket
                let key = extract_api_key(headers).unwrap_or_else(|| "anonymous".to_string());
                let result = limiter.check_rate_limit(&key);
                (key, result)
            }
            RateLimiterMode::PerIp(limiter) => {
                let ip = extract_client_ip(headers, peer.map(|addr| addr.ip()));
                let result = limiter.check_rate_limit(&ip);
                (ip, result)
            }
        }
    }
}

/// Middleware to enforce rate limiting in the configured mode
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiterMode>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let (identity, result) = limiter.check(&headers, peer);

    match result {
        Ok(()) => next.run(request).await,
        Err(wait_duration) => {
            // Whole seconds, rounded up
            let retry_after =
                (wait_duration.as_secs() + u64::from(wait_duration.subsec_nanos() > 0)).max(1);

            let who = match &limiter {
                RateLimiterMode::PerKey(_) if identity == "anonymous" => "unauthenticated",
                RateLimiterMode::PerKey(_) => "api key",
                RateLimiterMode::PerIp(_) => identity.as_str(),
            };
            tracing::warn!(
                client = who,
                retry_after_secs = retry_after,
                "Rate limit exceeded"
            );

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse {
                    status: "error".to_string(),
                    error: format!(
                        "Rate limit exceeded. Please retry after {} seconds.",
                        retry_after
                    ),
                }),
            )
                .into_response();

            response
                .headers_mut()
                .insert("Retry-After", axum::http::HeaderValue::from(retry_after));

            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = PerKeyRateLimiter::new(RateLimitConfig {
            per_second: 5,
            burst_size: 10,
        });
        assert_eq!(limiter.tracked_keys_count(), 0);
    }

    #[test]
    fn test_rate_limiter_allows_requests_within_limit() {
        let limiter = PerKeyRateLimiter::new(RateLimitConfig {
            per_second: 10,
            burst_size: 5,
        });

        for i in 0..5 {
            let result = limiter.check_rate_limit("test-key");
            assert!(result.is_ok(), "Request {} should be allowed", i);
        }
    }

    #[test]
    fn test_rate_limiter_rejects_requests_over_limit() {
        let limiter = PerKeyRateLimiter::new(RateLimitConfig {
            per_second: 10,
            burst_size: 3,
        });

        for _ in 0..3 {
            assert!(limiter.check_rate_limit("test-key").is_ok());
        }

        let result = limiter.check_rate_limit("test-key");
        assert!(result.is_err(), "Request over burst should be rejected");
        if let Err(wait_duration) = result {
            assert!(wait_duration > Duration::from_millis(0));
        }
    }

    #[test]
    fn test_rate_limiter_separate_keys_independent() {
        let limiter = PerKeyRateLimiter::new(RateLimitConfig {
            per_second: 10,
            burst_size: 2,
        });

        assert!(limiter.check_rate_limit("key1").is_ok());
        assert!(limiter.check_rate_limit("key1").is_ok());
        assert!(limiter.check_rate_limit("key1").is_err());

        assert!(limiter.check_rate_limit("key2").is_ok());
        assert!(limiter.check_rate_limit("key2").is_ok());
        assert!(limiter.check_rate_limit("key2").is_err());

        assert_eq!(limiter.tracked_keys_count(), 2);
    }

    #[test]
    fn test_per_ip_limiter_tracks_addresses() {
        let limiter = PerIpRateLimiter::new(RateLimitConfig {
            per_second: 1,
            burst_size: 1,
        });

        assert!(limiter.check_rate_limit("10.0.0.1").is_ok());
        assert!(limiter.check_rate_limit("10.0.0.1").is_err());
        assert!(limiter.check_rate_limit("10.0.0.2").is_ok());
        assert_eq!(limiter.tracked_ips_count(), 2);
    }

    #[test]
    fn test_zero_config_values_do_not_panic() {
        let limiter = PerKeyRateLimiter::new(RateLimitConfig {
            per_second: 0,
            burst_size: 0,
        });
        assert!(limiter.check_rate_limit("k").is_ok());
        assert!(limiter.check_rate_limit("k").is_err());
    }

    #[test]
    fn test_rate_limiter_default_configs() {
        assert_eq!(
            RateLimitConfig::default(),
            RateLimitConfig {
                per_second: 10,
                burst_size: 20
            }
        );
        assert_eq!(
            RateLimitConfig::unauthenticated(),
            RateLimitConfig {
                per_second: 5,
                burst_size: 10
            }
        );
    }

    #[test]
    fn test_mode_description_and_config() {
        let mode = RateLimiterMode::PerIp(PerIpRateLimiter::new(RateLimitConfig::unauthenticated()));
        assert_eq!(mode.mode_description(), "per IP address");
        assert_eq!(mode.config().per_second, 5);
    }

    #[test]
    fn test_mode_check_per_key_uses_anonymous_bucket() {
        let limiter = PerKeyRateLimiter::new(RateLimitConfig {
            per_second: 1,
            burst_size: 1,
        });
        let mode = RateLimiterMode::PerKey(limiter.clone());

        let (identity, result) = mode.check(&HeaderMap::new(), None);
        assert_eq!(identity, "anonymous");
        assert!(result.is_ok());
        assert!(mode.check(&HeaderMap::new(), None).1.is_err());
        assert_eq!(limiter.tracked_keys_count(), 1);
    }

    #[test]
    fn test_mode_check_per_ip_uses_peer_address() {
        let mode = RateLimiterMode::PerIp(PerIpRateLimiter::new(RateLimitConfig::default()));
        let peer: SocketAddr = "192.168.1.7:5555".parse().unwrap();

        let (identity, result) = mode.check(&HeaderMap::new(), Some(peer));
        assert_eq!(identity, "192.168.1.7");
        assert!(result.is_ok());
    }

    #[test]
    fn test_select_mode() {
        let auth = RateLimitConfig::default();
        let unauth = RateLimitConfig::unauthenticated();

        assert!(RateLimiterMode::select(RateLimitSetting::Disabled, &auth, &unauth, true).is_none());
        assert!(matches!(
            RateLimiterMode::select(RateLimitSetting::Auto, &auth, &unauth, true),
            Some(RateLimiterMode::PerKey(_))
        ));
        assert!(matches!(
            RateLimiterMode::select(RateLimitSetting::Auto, &auth, &unauth, false),
            Some(RateLimiterMode::PerIp(_))
        ));
        assert!(matches!(
            RateLimiterMode::select(RateLimitSetting::PerKey, &auth, &unauth, false),
            Some(RateLimiterMode::PerKey(_))
        ));
    }
}
