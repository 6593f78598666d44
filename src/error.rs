//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the HTTP surface. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response. WebSocket delivery failures use
//! [`crate::domain::DeliveryError`] instead and never reach a caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 3002,
///     "message": "AI service unavailable",
///     "details": "connection refused"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
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
/// | Range     | Category        | HTTP Status                 |
/// |-----------|-----------------|-----------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request             |
/// | 2000–2999 | Not Found       | 404 Not Found               |
/// | 3000–3999 | Server/Upstream | 500 / 502 Bad Gateway       |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Article with the given ID was not found.
    #[error("article not found: {0}")]
    ArticleNotFound(i64),

    /// An upstream service could not be reached or answered badly.
    #[error("{service} service unavailable")]
    UpstreamUnavailable {
        /// Display name of the upstream (`"AI"`, `"SNS"`).
        service: &'static str,
        /// Underlying cause, surfaced in `details`.
        reason: String,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// A simulation slot did not produce a result.
    #[error("simulation slot {slot} failed")]
    SimulationFailed {
        /// Index of the failed slot.
        slot: usize,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::ArticleNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::UpstreamUnavailable { .. } => 3002,
            Self::SimulationFailed { .. } => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ArticleNotFound(_) => StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::PersistenceError(_) | Self::SimulationFailed { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::UpstreamUnavailable { reason, .. } => Some(reason.clone()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn upstream_maps_to_bad_gateway() {
        let err = GatewayError::UpstreamUnavailable {
            service: "AI",
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "AI service unavailable");
        assert_eq!(err.details().as_deref(), Some("connection refused"));
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = GatewayError::InvalidRequest("title must not be empty".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn into_response_carries_status() {
        let response = GatewayError::SimulationFailed { slot: 2 }.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
