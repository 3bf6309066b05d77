use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::get,
    Router,
};

use quill_core::Page;
use quill_posts::{Author, NewPost, PostChanges, post_not_found};

use crate::app::dto::{ListParams, ModifyPostRequest, PostDto, WritePostRequest};
use crate::app::envelope::Outcome;
use crate::app::errors::ApiResult;
use crate::app::extract::{Params, PostIdPath, ValidJson};
use crate::app::services::AppServices;
use crate::context::RequestAuth;

use super::system::method_not_allowed;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(write).fallback(method_not_allowed))
        .route("/mine", get(mine).fallback(method_not_allowed))
        .route(
            "/:id",
            get(item).put(modify).delete(delete).fallback(method_not_allowed),
        )
}

#[tracing::instrument(name = "posts.list", skip_all)]
pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Params(params): Params<ListParams>,
) -> ApiResult<Outcome<Page<PostDto>>> {
    let query = params.into_query(services.default_page_size());
    let page = services.posts().list(&query).await?;

    Ok(Outcome::ok(
        format!("Fetched page {} of posts.", page.current_page_number),
        page.map(PostDto::from),
    ))
}

#[tracing::instrument(name = "posts.mine", skip_all)]
pub async fn mine(
    Extension(services): Extension<Arc<AppServices>>,
    auth: RequestAuth,
    Params(params): Params<ListParams>,
) -> ApiResult<Outcome<Page<PostDto>>> {
    let actor = auth.actor().await?;
    let request = params.page_request(services.default_page_size());
    let page = services.posts().list_by_author(actor.id, request).await?;

    Ok(Outcome::ok(
        format!("Fetched page {} of your posts.", page.current_page_number),
        page.map(PostDto::from),
    ))
}

#[tracing::instrument(name = "posts.item", skip(services, auth))]
pub async fn item(
    Extension(services): Extension<Arc<AppServices>>,
    auth: RequestAuth,
    PostIdPath(id): PostIdPath,
) -> ApiResult<Outcome<PostDto>> {
    let post = services
        .posts()
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    auth.ensure_can_read(&post).await?;

    Ok(Outcome::ok(format!("Fetched post #{id}."), PostDto::from(&post)))
}

#[tracing::instrument(name = "posts.write", skip_all)]
pub async fn write(
    Extension(services): Extension<Arc<AppServices>>,
    auth: RequestAuth,
    ValidJson(body): ValidJson<WritePostRequest>,
) -> ApiResult<Outcome<PostDto>> {
    let actor = auth.actor().await?;

    let post = services
        .posts()
        .create(NewPost {
            author: Author::from(actor),
            title: body.title,
            content: body.content,
            published: body.published,
            listed: body.listed,
        })
        .await?;
    tracing::info!(post_id = %post.id, author_id = %actor.id, "post created");

    Ok(Outcome::created(
        format!("Post #{} has been created.", post.id),
        PostDto::from(&post),
    ))
}

#[tracing::instrument(name = "posts.modify", skip(services, auth, body))]
pub async fn modify(
    Extension(services): Extension<Arc<AppServices>>,
    auth: RequestAuth,
    PostIdPath(id): PostIdPath,
    ValidJson(body): ValidJson<ModifyPostRequest>,
) -> ApiResult<Outcome<PostDto>> {
    auth.actor().await?;

    let post = services
        .posts()
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;
    auth.ensure_can_modify(&post).await?;

    let updated = services
        .posts()
        .update(&post, PostChanges::from(body))
        .await?;

    Ok(Outcome::ok(
        format!("Post #{id} has been modified."),
        PostDto::from(&updated),
    ))
}

#[tracing::instrument(name = "posts.delete", skip(services, auth))]
pub async fn delete(
    Extension(services): Extension<Arc<AppServices>>,
    auth: RequestAuth,
    PostIdPath(id): PostIdPath,
) -> ApiResult<Outcome<()>> {
    auth.actor().await?;

    let post = services
        .posts()
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;
    auth.ensure_can_delete(&post).await?;

    services.posts().delete(&post).await?;
    tracing::info!(post_id = %id, "post deleted");

    Ok(Outcome::done(format!("Post #{id} has been deleted.")))
}
