//! Uniform `{code, msg, data}` response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use quill_core::ResultCode;

/// Every response body, success or failure.
///
/// The HTTP status is taken from `code`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
    pub code: ResultCode,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    pub fn new(code: ResultCode, msg: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data,
        }
    }

    /// `200-1` with a payload.
    pub fn ok(msg: impl Into<String>, data: T) -> Self {
        Self::new(ResultCode::OK, msg, Some(data))
    }

    /// `201-1` with a payload.
    pub fn created(msg: impl Into<String>, data: T) -> Self {
        Self::new(ResultCode::CREATED, msg, Some(data))
    }

    /// `200-1` with `data: null`.
    pub fn done(msg: impl Into<String>) -> Self {
        Self::new(ResultCode::OK, msg, None)
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for Outcome<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_code_as_string_and_null_data() {
        let outcome: Outcome<()> = Outcome::done("Post #3 has been deleted.");
        let body = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            body,
            json!({ "code": "200-1", "msg": "Post #3 has been deleted.", "data": null })
        );
    }

    #[test]
    fn status_follows_code() {
        let created = Outcome::created("made", 1);
        assert_eq!(created.status(), StatusCode::CREATED);

        let conflict: Outcome<()> = Outcome::new(ResultCode::new(409, 1), "taken", None);
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);
    }
}
