//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use orbital_core::OrbitalError;
use serde_json::json;

/// Failure of an API request
#[derive(Debug)]
pub enum ApiError {
    /// No user identity was forwarded with the request
    Unauthenticated,

    Core(OrbitalError),
}

impl From<OrbitalError> for ApiError {
    fn from(err: OrbitalError) -> Self {
        ApiError::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "unauthenticated",
                    "message": "missing user identity",
                }),
            ),
            ApiError::Core(OrbitalError::Validation(e)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation",
                    "bookId": e.book_id,
                    "reason": e.reason.to_string(),
                }),
            ),
            ApiError::Core(e) if e.is_retryable() => {
                tracing::error!(error = %e, "storage failure");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({
                        "error": "storage",
                        "retryable": true,
                        "message": e.to_string(),
                    }),
                )
            }
            ApiError::Core(e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal",
                        "retryable": false,
                        "message": e.to_string(),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
