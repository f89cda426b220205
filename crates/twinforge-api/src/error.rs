//! Error types for the HTTP API layer.
//!
//! [`ApiError`] unifies every failure a handler can hit into a single
//! enum that converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. The
//! body is always `{"error": <message>, "status": <code>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use twinforge_genai::GenAiError;
use twinforge_store::StoreError;

/// Errors that can occur in the HTTP API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request body or query failed to decode or validate.
    #[error("{0}")]
    BadRequest(String),

    /// A path identifier is not a valid number.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// A uniqueness constraint in the store was violated.
    #[error(transparent)]
    Conflict(#[from] StoreError),

    /// An upload exceeded the configured size ceiling.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The generation adapter rejected the request or failed.
    #[error(transparent)]
    Generation(#[from] GenAiError),
}

impl ApiError {
    /// Shorthand for a not-found error naming the entity kind.
    pub fn not_found(kind: &str) -> Self {
        Self::NotFound(format!("{kind} not found"))
    }

    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_)
            | Self::InvalidId(_)
            | Self::Generation(GenAiError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(%status, error = %message, "request failed");
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
