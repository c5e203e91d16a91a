//! Error types.
//!
//! Two layers, never mixed:
//!
//! - [`Error`] surfaces infrastructure failures — binding a port, accepting a
//!   connection. Returned by [`Server::serve`](crate::Server::serve).
//! - [`ApiError`] is what handlers produce. It converts into an HTTP response
//!   via [`IntoResponse`], so handlers can propagate with `?` and the caller
//!   still gets a well-formed reply.

use http::StatusCode;
use thiserror::Error as ThisError;

use crate::response::{IntoResponse, Response};

/// Infrastructure error. Application-level failures (422, 500) are expressed
/// as [`Response`] values, not as `Error`s.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Socket-level failure from bind or accept.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Handler-level error.
#[derive(Debug, ThisError)]
pub enum ApiError {
    /// The request body did not conform to the expected shape: a required
    /// field was missing, a field had the wrong type, or a field failed a
    /// domain check. Detected before any store mutation.
    #[error("validation: {0}")]
    Validation(String),

    /// Anything unexpected. Surfaced to the client as an opaque 500.
    #[error("internal: {0}")]
    Internal(String),
}

impl ApiError {
    /// Wraps any displayable cause as a [`ApiError::Validation`].
    pub fn validation(cause: impl std::fmt::Display) -> Self {
        Self::Validation(cause.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(detail) => Response::builder()
                .status(StatusCode::UNPROCESSABLE_ENTITY)
                .json(error_body(&detail)),
            // Detail stays server-side; the client gets an opaque 500.
            Self::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .json(error_body("internal server error"))
            }
        }
    }
}

/// Lets handlers return `Result<Response, ApiError>` and use `?`.
impl<T: IntoResponse> IntoResponse for Result<T, ApiError> {
    fn into_response(self) -> Response {
        match self {
            Ok(value) => value.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

fn error_body(detail: &str) -> Vec<u8> {
    // serde_json cannot fail on a one-entry string map.
    serde_json::to_vec(&serde_json::json!({ "error": detail }))
        .unwrap_or_else(|_| br#"{"error":"internal server error"}"#.to_vec())
}
