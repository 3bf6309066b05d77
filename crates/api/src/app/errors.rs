use axum::response::{IntoResponse, Response};

use quill_auth::AuthzError;
use quill_core::{DomainError, ErrorKind, ResultCode};

use super::envelope::Outcome;

pub type ApiResult<T> = Result<T, ApiError>;

/// Boundary error: the only place a failure becomes an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// The path exists but does not accept the request method (`405-1`).
    MethodNotAllowed,
}

impl ApiError {
    pub fn code(&self) -> ResultCode {
        match self {
            ApiError::Domain(err) => err.code(),
            ApiError::MethodNotAllowed => ResultCode::new(405, 1),
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Domain(err) => err.to_string(),
            ApiError::MethodNotAllowed => "Method not allowed.".to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        Self::Domain(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        match &self {
            ApiError::Domain(DomainError::Internal(detail)) => {
                tracing::error!(%code, detail = %detail, "request failed");
            }
            ApiError::Domain(err) if err.kind() == ErrorKind::Validation => {
                tracing::debug!(%code, "request rejected by validation");
            }
            other => {
                tracing::debug!(%code, msg = %other.message(), "request refused");
            }
        }

        Outcome::<()>::new(code, self.message(), None).into_response()
    }
}
