use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
    routing::post,
    Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, TokenResponse},
        jwt::JwtKeys,
        password::verify_password,
    },
    error::AppError,
    extract::{method_not_allowed, JsonBody},
    response::respond,
    state::AppState,
    validation::Validate,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login).fallback(method_not_allowed))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let user = match state.users.find_by_username(&payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!("login unknown username");
            return Err(invalid_credentials());
        }
        Err(e) => return Err(AppError::internal("Failed to look up user", e)),
    };

    let ok = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal("Failed to verify password", e))?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(invalid_credentials());
    }

    let token = JwtKeys::from_ref(&state)
        .sign(&user.username)
        .map_err(|e| AppError::internal("Failed to generate token", e))?;

    info!(user_id = user.id, "user logged in");
    Ok(respond(StatusCode::OK, &TokenResponse { token }))
}
