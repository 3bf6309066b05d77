//! Domain error model.
//!
//! Every failure an operation can raise is one of these kinds. The status class
//! is a property of the kind, never of the call site, so a failure's
//! [`ResultCode`] always agrees with the status it is reported under.

use thiserror::Error;

use crate::{ResultCode, Violations};

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failure kind, fixing the status class.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    Internal,
}

impl ErrorKind {
    pub const fn status(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Unauthenticated => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }
}

/// Domain-level error.
///
/// `seq` is the sub-index rendered after the status (`401-2`). Messages are
/// user-facing and must not carry internal detail; `Internal` keeps its detail
/// for logs and displays a fixed message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing, malformed, or unknown credential.
    #[error("{message}")]
    Unauthenticated { seq: u16, message: String },

    /// Authenticated, but not entitled to act on the resource.
    #[error("{message}")]
    Forbidden { seq: u16, message: String },

    /// The requested record does not exist.
    #[error("{message}")]
    NotFound { seq: u16, message: String },

    /// Uniqueness violation (e.g. duplicate username).
    #[error("{message}")]
    Conflict { seq: u16, message: String },

    /// One or more field-level violations.
    #[error("{0}")]
    Validation(Violations),

    /// Storage or other infrastructure failure.
    #[error("internal server error")]
    Internal(String),
}

impl DomainError {
    pub fn unauthenticated(seq: u16, msg: impl Into<String>) -> Self {
        Self::Unauthenticated { seq, message: msg.into() }
    }

    pub fn forbidden(seq: u16, msg: impl Into<String>) -> Self {
        Self::Forbidden { seq, message: msg.into() }
    }

    pub fn not_found(seq: u16, msg: impl Into<String>) -> Self {
        Self::NotFound { seq, message: msg.into() }
    }

    pub fn conflict(seq: u16, msg: impl Into<String>) -> Self {
        Self::Conflict { seq, message: msg.into() }
    }

    pub fn validation(violations: Violations) -> Self {
        Self::Validation(violations)
    }

    /// Shorthand for a validation failure on a single field.
    pub fn invalid_field(
        field: impl Into<String>,
        rule: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation(Violations::single(field, rule, reason))
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            DomainError::Forbidden { .. } => ErrorKind::Forbidden,
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Conflict { .. } => ErrorKind::Conflict,
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> ResultCode {
        let seq = match self {
            DomainError::Unauthenticated { seq, .. }
            | DomainError::Forbidden { seq, .. }
            | DomainError::NotFound { seq, .. }
            | DomainError::Conflict { seq, .. } => *seq,
            DomainError::Validation(_) | DomainError::Internal(_) => 1,
        };
        ResultCode::new(self.kind().status(), seq)
    }
}

impl From<Violations> for DomainError {
    fn from(value: Violations) -> Self {
        Self::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_status_matches_kind() {
        let cases = [
            (DomainError::unauthenticated(2, "Password does not match."), "401-2"),
            (DomainError::forbidden(1, "nope"), "403-1"),
            (DomainError::not_found(1, "gone"), "404-1"),
            (DomainError::conflict(1, "taken"), "409-1"),
            (DomainError::invalid_field("title", "NotBlank", "must not be blank"), "400-1"),
            (DomainError::internal("connection refused"), "500-1"),
        ];

        for (err, expected) in cases {
            assert_eq!(err.code().to_string(), expected);
            assert_eq!(err.code().status(), err.kind().status());
        }
    }

    #[test]
    fn internal_detail_is_not_displayed() {
        let err = DomainError::internal("pool timed out after 30s");
        assert_eq!(err.to_string(), "internal server error");
    }

    #[test]
    fn validation_displays_aggregated_message() {
        let mut v = Violations::new();
        v.not_blank("title", "").not_blank("content", "");
        let err = DomainError::from(v);
        assert_eq!(
            err.to_string(),
            "content : NotBlank : must not be blank\ntitle : NotBlank : must not be blank"
        );
    }
}
