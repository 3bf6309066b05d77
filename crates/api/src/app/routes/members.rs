use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use quill_auth::{NewMember, username_taken};
use quill_core::DomainError;

use crate::app::dto::{JoinRequest, LoginRequest, LoginResponse, MemberDto};
use crate::app::envelope::Outcome;
use crate::app::errors::ApiResult;
use crate::app::extract::ValidJson;
use crate::app::services::AppServices;
use crate::context::RequestAuth;

use super::system::method_not_allowed;

pub fn router() -> Router {
    Router::new()
        .route("/join", post(join).fallback(method_not_allowed))
        .route("/login", post(login).fallback(method_not_allowed))
        .route("/me", get(me).fallback(method_not_allowed))
}

#[tracing::instrument(name = "members.join", skip_all)]
pub async fn join(
    Extension(services): Extension<Arc<AppServices>>,
    ValidJson(body): ValidJson<JoinRequest>,
) -> ApiResult<Outcome<MemberDto>> {
    if services.members().find_by_username(&body.username).await?.is_some() {
        return Err(username_taken().into());
    }

    let member = services
        .members()
        .create(NewMember::new(body.username, body.password, body.nickname))
        .await?;
    tracing::info!(member_id = %member.id, "member joined");

    Ok(Outcome::created(
        format!("Welcome aboard, {}. Sign-up complete.", member.nickname),
        MemberDto::from(&member),
    ))
}

#[tracing::instrument(name = "members.login", skip_all)]
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> ApiResult<Outcome<LoginResponse>> {
    let member = services
        .members()
        .find_by_username(&body.username)
        .await?
        .ok_or_else(|| DomainError::unauthenticated(1, "Unknown username."))?;

    if !member.password_matches(&body.password) {
        return Err(DomainError::unauthenticated(2, "Password does not match.").into());
    }

    Ok(Outcome::ok(
        format!("Welcome back, {}.", member.nickname),
        LoginResponse {
            item: MemberDto::from(&member),
            api_key: member.api_key.as_str().to_string(),
        },
    ))
}

#[tracing::instrument(name = "members.me", skip_all)]
pub async fn me(auth: RequestAuth) -> ApiResult<Outcome<MemberDto>> {
    let actor = auth.actor().await?;
    Ok(Outcome::ok("Fetched your profile.", MemberDto::from(actor)))
}
