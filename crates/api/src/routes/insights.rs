//! Budget insight route.

use axum::{Json, Router, extract::State, routing::post};
use civicspend_core::insight::InsightRequest;
use serde::Serialize;

use crate::{AppState, error::ApiError, extractors::JsonBody};

/// Creates the insight routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/get-ai-insights", post(get_insights))
}

/// Response for `POST /get-ai-insights`.
#[derive(Debug, Serialize)]
pub struct InsightResponse {
    /// Generated summary.
    pub insights: String,
}

/// POST `/get-ai-insights` - summarise the supplied rows.
async fn get_insights(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<InsightRequest>,
) -> Result<Json<InsightResponse>, ApiError> {
    let insights = state.insights.generate(request).await?;
    Ok(Json(InsightResponse { insights }))
}
