use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod repo;
pub mod repo_types;

#[cfg(test)]
mod tests;

pub fn router() -> Router<AppState> {
    handlers::post_routes()
}
