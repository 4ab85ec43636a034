use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use tracing::{info, instrument, warn};

use super::{dto::UserPayload, repo_types::NewUser};
use crate::{
    auth::{extractors::AuthUser, password::hash_password},
    db::StoreError,
    error::AppError,
    extract::{method_not_allowed, parse_id, require_id, IdQuery, JsonBody},
    response::{respond, Success},
    state::AppState,
    validation::Validate,
};

const TAKEN: &str = "username or email already exists";

pub fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/user",
        get(get_users)
            .post(create_user)
            .put(update_user)
            .delete(delete_user)
            .fallback(method_not_allowed),
    )
}

/// 409 when another row already holds the username or email.
async fn ensure_unique(
    state: &AppState,
    payload: &UserPayload,
    exclude_id: Option<i32>,
) -> Result<(), AppError> {
    let count = state
        .users
        .count_taken(&payload.username, &payload.email, exclude_id)
        .await
        .map_err(|e| AppError::internal("Failed to check username or email", e))?;
    if count > 0 {
        warn!(username = %payload.username, "username or email already taken");
        return Err(AppError::Conflict(TAKEN.into()));
    }
    Ok(())
}

fn new_user(payload: UserPayload) -> Result<NewUser, AppError> {
    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal("Failed to hash password", e))?;
    Ok(NewUser {
        username: payload.username,
        email: payload.email,
        password_hash,
        is_active: payload.is_active,
    })
}

fn write_error(message: &str, e: StoreError) -> AppError {
    match e {
        // lost the race against a concurrent write with the same username/email
        StoreError::UniqueViolation => AppError::Conflict(TAKEN.into()),
        other => AppError::internal(message, other),
    }
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    ensure_unique(&state, &payload, None).await?;

    let user = state
        .users
        .create(&new_user(payload)?)
        .await
        .map_err(|e| write_error("Failed to create user", e))?;

    info!(user_id = user.id, username = %user.username, "user created");
    Ok(respond(StatusCode::CREATED, &user))
}

#[instrument(skip(state, _auth))]
pub async fn get_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdQuery(id): IdQuery,
) -> Result<Response, AppError> {
    let Some(raw) = id else {
        let users = state
            .users
            .list()
            .await
            .map_err(|e| AppError::internal("Failed to retrieve users", e))?;
        return Ok(respond(StatusCode::OK, &users));
    };

    let id = parse_id(&raw, "user")?;
    match state.users.find(id).await {
        Ok(Some(user)) => Ok(respond(StatusCode::OK, &user)),
        Ok(None) => Err(AppError::NotFound("User not found".into())),
        Err(e) => Err(AppError::internal("Failed to retrieve user", e)),
    }
}

/// Every update re-hashes the submitted password, whether or not it changed.
#[instrument(skip(state, auth, payload), fields(by = %auth.0.username))]
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let id = require_id(payload.id, "user")?;
    ensure_unique(&state, &payload, Some(id)).await?;

    let affected = state
        .users
        .update(id, &new_user(payload)?)
        .await
        .map_err(|e| write_error("Failed to update user", e))?;
    if affected == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    info!(user_id = id, "user updated");
    Ok(respond(StatusCode::OK, &Success::new("User updated successfully")))
}

#[instrument(skip(state, auth), fields(by = %auth.0.username))]
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdQuery(id): IdQuery,
) -> Result<Response, AppError> {
    let raw = id.ok_or_else(|| AppError::BadRequest("User ID is required".into()))?;
    let id = parse_id(&raw, "user")?;

    let affected = state
        .users
        .delete(id)
        .await
        .map_err(|e| AppError::internal("Failed to delete user", e))?;
    if affected == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    info!(user_id = id, "user deleted");
    Ok(respond(StatusCode::OK, &Success::new("User deleted successfully")))
}
