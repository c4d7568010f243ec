//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod budget;
pub mod health;
pub mod import;
pub mod insights;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(import::routes())
        .merge(budget::routes())
        .merge(insights::routes())
}
