//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - CORS, tracing, body-limit and panic layers
//! - The JSON error envelope

pub mod error;
pub mod extractors;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderName, Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use civicspend_core::budget::{BudgetService, BudgetStore};
use civicspend_core::insight::{InsightService, TextGenerator};
use civicspend_shared::AppConfig;
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// CSV import and department queries.
    pub budgets: BudgetService,
    /// Prompt building and text generation.
    pub insights: InsightService,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wires the services over a budget store and an optional text generator.
    #[must_use]
    pub fn new(
        store: Arc<dyn BudgetStore>,
        generator: Option<Arc<dyn TextGenerator>>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            budgets: BudgetService::new(store),
            insights: InsightService::new(generator, config.insights.max_prompt_rows),
            config,
        }
    }
}

/// Headers browsers may send cross-origin.
const ALLOWED_HEADERS: [HeaderName; 4] = [
    AUTHORIZATION,
    HeaderName::from_static("x-client-info"),
    HeaderName::from_static("apikey"),
    CONTENT_TYPE,
];

/// Permissive CORS: any origin, the dashboard's headers, GET/POST/OPTIONS.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS)
}

#[allow(clippy::needless_pass_by_value)]
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.server.max_upload_bytes;

    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
