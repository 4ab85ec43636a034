use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::warn;

use crate::error::AppError;

/// `Json<T>` whose rejection is an [`AppError`], so bad bodies get the usual envelope.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "undecodable request body");
                Err(AppError::BadRequest("Invalid request body".into()))
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct IdParams {
    id: Option<String>,
}

/// Raw `?id=` value; empty counts as absent.
#[derive(Debug)]
pub struct IdQuery(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for IdQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<IdParams>::try_from_uri(&parts.uri)
            .map_err(|_| AppError::BadRequest("Invalid query string".into()))?;
        Ok(IdQuery(params.id.filter(|v| !v.is_empty())))
    }
}

/// Parses a positive record id, naming `entity` in the error ("Invalid post ID").
pub fn parse_id(raw: &str, entity: &str) -> Result<i32, AppError> {
    let id = raw.parse::<i32>().unwrap_or(0);
    require_id(id, entity)
}

/// Ids in request bodies default to 0 when absent; only positive ids name a row.
pub fn require_id(id: i32, entity: &str) -> Result<i32, AppError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(AppError::BadRequest(format!("Invalid {entity} ID")))
    }
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".into())
}
