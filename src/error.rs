//! Relay error types with HTTP status code mapping.
//!
//! [`RelayError`] covers everything that can fail before a WebSocket channel
//! exists: configuration, the upgrade handshake, and the listener. Failures
//! on an open channel never reach the peer as structured errors; they are
//! logged by [`crate::ws::connection`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1101,
///     "message": "origin not allowed: https://evil.example",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status                  |
/// |-----------|------------|------------------------------|
/// | 1000–1099 | Config     | 500 Internal Server Error    |
/// | 1100–1199 | Handshake  | 4xx (from the rejection)     |
/// | 3000–3999 | Server     | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Configuration value is missing, malformed, or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The `Origin` header failed the configured origin policy.
    #[error("origin not allowed: {0}")]
    OriginRejected(String),

    /// The request is not a valid WebSocket upgrade.
    #[error("websocket upgrade rejected: {message}")]
    UpgradeRejected {
        /// Status reported by the upgrade extractor.
        status: StatusCode,
        /// Reason reported by the upgrade extractor.
        message: String,
    },

    /// Listener or socket I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidConfig(_) => 1001,
            Self::OriginRejected(_) => 1101,
            Self::UpgradeRejected { .. } => 1102,
            Self::Io(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::OriginRejected(_) => StatusCode::FORBIDDEN,
            Self::UpgradeRejected { status, .. } => *status,
            Self::InvalidConfig(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
