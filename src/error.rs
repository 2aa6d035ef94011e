use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

use crate::config::constants::{MAX_BATCH_CELLS, MAX_TEXT_LENGTH};

#[derive(Debug)]
pub enum FintextError {
    // I/O errors
    Io(std::io::Error),
    FileNotFound(String),

    // Input format errors
    Json(String),

    // Request validation errors
    InvalidRequest(String),
    EmptyText,
    TextTooLong(usize),
    BatchTooLarge(usize),

    // Auth errors
    Unauthorized,
    InvalidApiKey,

    // Internal errors
    TaskJoin(String),
    Unknown(String),
}

impl fmt::Display for FintextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FintextError::Io(e) => write!(f, "I/O error: {}", e),
            FintextError::FileNotFound(path) => write!(f, "File not found: {}", path),
            FintextError::Json(msg) => write!(f, "Invalid JSON: {}", msg),
            FintextError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            FintextError::EmptyText => write!(f, "Text cannot be empty"),
            FintextError::TextTooLong(len) => write!(
                f,
                "Text too long: {} characters (max {})",
                len, MAX_TEXT_LENGTH
            ),
            FintextError::BatchTooLarge(cells) => write!(
                f,
                "Batch too large: {} cells (max {})",
                cells, MAX_BATCH_CELLS
            ),
            FintextError::Unauthorized => write!(
                f,
                "API key required. Provide via X-API-Key or Authorization: Bearer header"
            ),
            FintextError::InvalidApiKey => write!(f, "Invalid API key"),
            FintextError::TaskJoin(msg) => write!(f, "Task execution error: {}", msg),
            FintextError::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for FintextError {}

// Conversions
impl From<std::io::Error> for FintextError {
    fn from(err: std::io::Error) -> Self {
        FintextError::Io(err)
    }
}

impl From<serde_json::Error> for FintextError {
    fn from(err: serde_json::Error) -> Self {
        FintextError::Json(err.to_string())
    }
}

impl From<tokio::task::JoinError> for FintextError {
    fn from(err: tokio::task::JoinError) -> Self {
        FintextError::TaskJoin(err.to_string())
    }
}

impl FintextError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FintextError::EmptyText
            | FintextError::TextTooLong(_)
            | FintextError::BatchTooLarge(_)
            | FintextError::InvalidRequest(_)
            | FintextError::Json(_) => StatusCode::BAD_REQUEST,
            FintextError::Unauthorized | FintextError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            FintextError::FileNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Axum integration
impl IntoResponse for FintextError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            axum::Json(serde_json::json!({
                "status": "error",
                "error": message
            })),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, FintextError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_request() {
        assert_eq!(FintextError::EmptyText.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            FintextError::TextTooLong(20_000).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FintextError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        assert_eq!(
            FintextError::InvalidApiKey.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = FintextError::Unknown("secret detail".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(FintextError::EmptyText.to_string(), "Text cannot be empty");
        assert!(FintextError::TextTooLong(5)
            .to_string()
            .contains(&MAX_TEXT_LENGTH.to_string()));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let converted: FintextError = err.into();
        assert!(matches!(converted, FintextError::Json(_)));
    }
}
