use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use tracing::{info, instrument};

use crate::{
    error::AppError,
    extract::{method_not_allowed, parse_id, IdQuery, JsonBody},
    posts::repo_types::Post,
    response::respond,
    state::AppState,
    validation::Validate,
};

pub fn dummy_routes() -> Router<AppState> {
    Router::new().route(
        "/dummyPost",
        get(get_dummy_posts)
            .post(create_dummy_post)
            .fallback(method_not_allowed),
    )
}

#[instrument(skip(state))]
pub async fn get_dummy_posts(
    State(state): State<AppState>,
    IdQuery(id): IdQuery,
) -> Result<Response, AppError> {
    let Some(raw) = id else {
        let posts = state
            .dummy
            .list()
            .await
            .map_err(|e| AppError::upstream("Failed to fetch posts", e))?;
        return Ok(respond(StatusCode::OK, &posts));
    };

    let id = parse_id(&raw, "post")?;
    match state.dummy.get(id).await {
        Ok(Some(post)) => Ok(respond(StatusCode::OK, &post)),
        Ok(None) => Err(AppError::NotFound("Post not found".into())),
        Err(e) => Err(AppError::upstream("Failed to fetch post", e)),
    }
}

#[instrument(skip(state, post))]
pub async fn create_dummy_post(
    State(state): State<AppState>,
    JsonBody(post): JsonBody<Post>,
) -> Result<Response, AppError> {
    post.validate()?;
    let created = state
        .dummy
        .create(&post)
        .await
        .map_err(|e| AppError::upstream("Failed to call external API", e))?;

    info!(post_id = created.id, "dummy post created upstream");
    Ok(respond(StatusCode::CREATED, &created))
}
