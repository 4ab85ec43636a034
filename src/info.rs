use std::net::SocketAddr;

use axum::{extract::ConnectInfo, http::StatusCode, response::Response, routing::get, Router};
use serde_json::json;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{error::AppError, response::respond, state::AppState};

pub fn info_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/time", get(server_time))
        .route("/ip", get(client_ip))
}

pub async fn index() -> Response {
    respond(StatusCode::OK, &json!({ "message": "Welcome to the Dummy API!" }))
}

pub async fn server_time() -> Result<Response, AppError> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| AppError::internal("Failed to format time", e))?;
    Ok(respond(StatusCode::OK, &json!({ "time": now })))
}

/// Peer address as seen by the listener; "unknown" when served without connect info.
pub async fn client_ip(connect: Option<ConnectInfo<SocketAddr>>) -> Response {
    let ip = connect
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    respond(StatusCode::OK, &json!({ "ip": ip }))
}
