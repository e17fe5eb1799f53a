//! Request-boundary error mapping.
//!
//! All core errors are recovered here and converted to an HTTP status plus a
//! machine-readable error code; nothing on the request path crashes the
//! serving process.

use axum::Json;
use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use drivecast_core::{AuthError, RangeError, UpstreamError};
use serde_json::json;
use tracing::{error, warn};

/// Errors surfaced by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response<Body> {
        let (status, code) = match &self {
            ApiError::Auth(AuthError::UnknownToken) => {
                warn!("Request with unrecognized session token");
                (StatusCode::UNAUTHORIZED, "invalid_token")
            }
            ApiError::Auth(AuthError::Expired) => {
                warn!("Request with expired credential");
                (StatusCode::UNAUTHORIZED, "token_expired")
            }
            ApiError::Auth(AuthError::Handshake { reason }) => {
                error!("Authorization handshake failed: {reason}");
                (StatusCode::BAD_GATEWAY, "handshake_failed")
            }
            // Corrected from the reference behavior, which returned a
            // generic 500 for out-of-range requests.
            ApiError::Range(e) => {
                warn!("Rejected range request: {e}");
                (StatusCode::RANGE_NOT_SATISFIABLE, "invalid_range")
            }
            ApiError::Upstream(UpstreamError::NotFound { id }) => {
                warn!("Upstream file not found: {id}");
                (StatusCode::NOT_FOUND, "file_not_found")
            }
            ApiError::Upstream(e) => {
                error!("Upstream failure: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "upstream_error")
            }
            ApiError::Internal { reason } => {
                error!("Internal error: {reason}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = Json(json!({
            "error": code,
            "detail": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_401() {
        let response = ApiError::from(AuthError::UnknownToken).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::from(AuthError::Expired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_range_errors_map_to_416() {
        let response = ApiError::from(RangeError::Unsatisfiable {
            start: 600,
            size: 500,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    }

    #[test]
    fn test_upstream_errors_map_to_500() {
        let response = ApiError::from(UpstreamError::Status { status: 503 }).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError::from(UpstreamError::Truncated {
            received: 10,
            expected: 100,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_file_maps_to_404() {
        let response = ApiError::from(UpstreamError::NotFound {
            id: "f1".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
