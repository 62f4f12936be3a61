//! Error types for the demo handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use request_logger::{ContextError, ErrorKind, RequestErrors};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Item not found: {0}")]
    NotFound(u32),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, kind) = match &self {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", ErrorKind::Public),
            Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request", ErrorKind::Public),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", ErrorKind::Private),
        };

        // Internal details go to the request log, not the client.
        let message = match kind {
            ErrorKind::Private => "internal error".to_string(),
            ErrorKind::Public => self.to_string(),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message
            }
        }));

        let mut response = (status, body).into_response();
        response
            .extensions_mut()
            .insert(RequestErrors(vec![ContextError::new(self.to_string(), kind)]));
        response
    }
}

pub type Result<T> = std::result::Result<T, Error>;
