//! Request extractors that reject into the response envelope.

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use quill_core::{DomainError, PostId, Validate};

use super::errors::ApiError;

/// JSON body that has been deserialized and field-validated before the handler runs.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(body_rejection)?;
        value.validate().map_err(DomainError::from)?;
        Ok(Self(value))
    }
}

fn body_rejection(rejection: JsonRejection) -> ApiError {
    let err = match rejection {
        JsonRejection::MissingJsonContentType(_) => DomainError::invalid_field(
            "body",
            "ContentType",
            "expected `Content-Type: application/json`",
        ),
        other => DomainError::invalid_field("body", "Readable", other.body_text()),
    };
    err.into()
}

/// Query string parameters; parse failures become `400-1`.
#[derive(Debug)]
pub struct Params<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Params<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| {
                DomainError::invalid_field("query", "Readable", rejection.body_text())
            })?;
        Ok(Self(value))
    }
}

/// `{id}` path segment as a [`PostId`].
///
/// Non-numeric or undecodable ids are a validation failure (`400-1`), not a 404.
#[derive(Debug)]
pub struct PostIdPath(pub PostId);

#[async_trait]
impl<S> FromRequestParts<S> for PostIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| {
                tracing::debug!(%rejection, "unreadable post id");
                DomainError::invalid_field("id", "Numeric", "PostId must be an integer")
            })?;
        Ok(Self(post_id(&raw)?))
    }
}

fn post_id(raw: &str) -> Result<PostId, ApiError> {
    Ok(raw.parse::<PostId>()?)
}
