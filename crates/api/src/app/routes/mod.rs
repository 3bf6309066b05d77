use axum::Router;

pub mod members;
pub mod posts;
pub mod system;

/// Router for every `/api/v1` endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/members", members::router())
        .nest("/posts", posts::router())
}
