use axum::http::StatusCode;

use quill_core::DomainError;

use crate::app::errors::ApiError;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Known path, unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Unknown routes still answer with the envelope.
pub async fn fallback() -> ApiError {
    DomainError::not_found(2, "No such endpoint.").into()
}
