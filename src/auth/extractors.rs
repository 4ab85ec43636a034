use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use super::{
    claims::Claims,
    jwt::{AuthError, JwtKeys},
};
use crate::error::AppError;

/// Claims of a verified bearer token. Taking this as a handler argument
/// makes the route require authentication.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// Pulls the token out of `Authorization: Bearer <token>`. The prefix is case-sensitive.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AuthError::Missing)
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Missing => AppError::Unauthorized("Missing or invalid token".into()),
            AuthError::Invalid | AuthError::Expired => AppError::Unauthorized("Invalid token".into()),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).map_err(|e| {
            warn!(uri = %parts.uri, "request without bearer token");
            e
        })?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(uri = %parts.uri, reason = %e, "bearer token rejected");
            e
        })?;

        Ok(AuthUser(claims))
    }
}
