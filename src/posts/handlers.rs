use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use tracing::{info, instrument};

use super::repo_types::Post;
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    extract::{method_not_allowed, parse_id, require_id, IdQuery, JsonBody},
    response::{respond, Success},
    state::AppState,
    validation::Validate,
};

pub fn post_routes() -> Router<AppState> {
    Router::new().route(
        "/post",
        get(get_posts)
            .post(create_post)
            .put(update_post)
            .delete(delete_post)
            .fallback(method_not_allowed),
    )
}

#[instrument(skip(state, auth), fields(by = %auth.0.username))]
pub async fn get_posts(
    State(state): State<AppState>,
    auth: AuthUser,
    IdQuery(id): IdQuery,
) -> Result<Response, AppError> {
    let Some(raw) = id else {
        let posts = state
            .posts
            .list()
            .await
            .map_err(|e| AppError::internal("Failed to get posts", e))?;
        return Ok(respond(StatusCode::OK, &posts));
    };

    let id = parse_id(&raw, "post")?;
    match state.posts.find(id).await {
        Ok(Some(post)) => Ok(respond(StatusCode::OK, &post)),
        Ok(None) => Err(AppError::NotFound("Post not found".into())),
        Err(e) => Err(AppError::internal("Failed to get post", e)),
    }
}

#[instrument(skip(state, auth, post), fields(by = %auth.0.username))]
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(post): JsonBody<Post>,
) -> Result<Response, AppError> {
    post.validate()?;
    let created = state
        .posts
        .create(&post)
        .await
        .map_err(|e| AppError::internal("Failed to insert post", e))?;

    info!(post_id = created.id, "post created");
    Ok(respond(StatusCode::CREATED, &created))
}

#[instrument(skip(state, auth, post), fields(by = %auth.0.username))]
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(post): JsonBody<Post>,
) -> Result<Response, AppError> {
    post.validate()?;
    require_id(post.id, "post")?;
    let affected = state
        .posts
        .update(&post)
        .await
        .map_err(|e| AppError::internal("Failed to update post", e))?;
    if affected == 0 {
        return Err(AppError::NotFound("Post not found".into()));
    }

    info!(post_id = post.id, "post updated");
    Ok(respond(StatusCode::OK, &post))
}

#[instrument(skip(state, auth), fields(by = %auth.0.username))]
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    IdQuery(id): IdQuery,
) -> Result<Response, AppError> {
    let raw = id.ok_or_else(|| AppError::BadRequest("Post ID is required".into()))?;
    let id = parse_id(&raw, "post")?;

    let affected = state
        .posts
        .delete(id)
        .await
        .map_err(|e| AppError::internal("Failed to delete post", e))?;
    if affected == 0 {
        return Err(AppError::NotFound("Post not found".into()));
    }

    info!(post_id = id, "post deleted");
    Ok(respond(StatusCode::OK, &Success::new("Post deleted successfully")))
}
