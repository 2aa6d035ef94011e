use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::utils::header_utils::{extract_api_key, extract_client_ip};

/// Request ID wrapper for tracking requests through the system
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Reuse the caller's `X-Request-ID` or mint a UUID, and echo it back
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get("X-Request-ID")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("X-Request-ID", header_value);
    }

    response
}

/// First 8 hex chars of the key's md5, never the key itself
pub fn api_key_fingerprint(key: &str) -> String {
    format!("{:x}", md5::compute(key.as_bytes()))
        .chars()
        .take(8)
        .collect()
}

/// Log every request to the `access_log` target; warn on slow ones
pub async fn access_log_middleware(
    State(slow_threshold): State<Duration>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(|q| q.to_string());

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client_ip = extract_client_ip(req.headers(), peer);

    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let api_key_hash = extract_api_key(req.headers()).map(|key| api_key_fingerprint(&key));

    let response = next.run(req).await;

    let status = response.status();
    let duration = start.elapsed();

    let bytes_sent = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    tracing::info!(
        target: "access_log",
        request_id = %request_id,
        client_ip = %client_ip,
        method = %method,
        path = %path,
        query = ?query,
        status = status.as_u16(),
        duration_ms = duration.as_millis() as u64,
        bytes_sent = bytes_sent,
        user_agent = %user_agent,
        api_key_hash = ?api_key_hash,
        "HTTP request completed"
    );

    if duration > slow_threshold {
        tracing::warn!(
            request_id = %request_id,
            path = %path,
            duration_ms = duration.as_millis() as u64,
            threshold_ms = slow_threshold.as_millis() as u64,
            "Slow request detected"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_fingerprint_is_short_and_stable() {
        let hash = api_key_fingerprint("secret-api-key-12345");
        assert_eq!(hash.len(), 8);
        assert_ne!(hash, "secret-api-key-12345");
        assert_eq!(hash, api_key_fingerprint("secret-api-key-12345"));
    }

    #[test]
    fn test_api_key_fingerprint_known_value() {
        // md5("test") = 098f6bcd4621d373cade4e832627b4f6
        assert_eq!(api_key_fingerprint("test"), "098f6bcd");
    }

    #[test]
    fn test_api_key_fingerprint_different_keys() {
        assert_ne!(api_key_fingerprint("key-one"), api_key_fingerprint("key-two"));
    }

    #[test]
    fn test_request_id_wrapper() {
        let id = RequestId("test-id-123".to_string());
        assert_eq!(id.clone().0, "test-id-123");
    }
}
