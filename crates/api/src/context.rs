use std::ops::Deref;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use quill_auth::AuthContext;
use quill_core::DomainError;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::middleware::extract_bearer;

/// Authentication context for one request.
///
/// Extraction only captures the raw credential; the API key is looked up the
/// first time a handler asks for the actor, and at most once.
#[derive(Debug)]
pub struct RequestAuth(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for RequestAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let services = parts
            .extensions
            .get::<Arc<AppServices>>()
            .ok_or_else(|| DomainError::internal("AppServices extension missing"))?;

        let credential = extract_bearer(&parts.headers);
        Ok(Self(services.identity().context(credential)))
    }
}

impl Deref for RequestAuth {
    type Target = AuthContext;

    fn deref(&self) -> &AuthContext {
        &self.0
    }
}
