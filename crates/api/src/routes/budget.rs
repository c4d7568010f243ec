//! Department budget routes.
//!
//! `POST /get-budget` returns rows as JSON; `GET /budget-table` renders the
//! same rows as the presentation table.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, header::ACCEPT},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use civicspend_core::budget::{BudgetQuery, BudgetRow, DepartmentFilter};
use civicspend_core::report::BudgetTable;
use serde::Serialize;
use tracing::debug;

use crate::{AppState, error::ApiError, extractors::JsonBody};

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/get-budget", post(get_budget))
        .route("/budget-table", get(budget_table))
}

/// Response for `POST /get-budget`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDataResponse {
    /// Matching rows, highest usage first.
    pub budget_data: Vec<BudgetRow>,
}

/// POST `/get-budget` - rows for one department.
async fn get_budget(
    State(state): State<AppState>,
    JsonBody(query): JsonBody<BudgetQuery>,
) -> Result<Json<BudgetDataResponse>, ApiError> {
    let filter = DepartmentFilter::try_from(query)?;
    let budget_data = state.budgets.fetch(&filter).await?;
    Ok(Json(BudgetDataResponse { budget_data }))
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// GET `/budget-table?department=&ward=` - HTML table, or JSON on request.
async fn budget_table(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<BudgetQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        debug!(%rejection, "Rejected budget table query");
        ApiError::validation("Invalid query string")
    })?;
    let filter = DepartmentFilter::try_from(query)?;
    let rows = state.budgets.fetch(&filter).await?;
    let table = BudgetTable::build(&filter.department, &rows);

    if wants_json(&headers) {
        Ok(Json(table).into_response())
    } else {
        Ok(Html(table.to_html()).into_response())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };
    use civicspend_core::budget::InMemoryBudgetStore;
    use rstest::rstest;

    use crate::test_support::{app, budget_row, json, post_json, send};

    fn seeded() -> Arc<InMemoryBudgetStore> {
        Arc::new(InMemoryBudgetStore::with_rows(vec![
            budget_row("Parks", "Lighting", 1000, 250),
            budget_row("Parks", "Maintenance", 5000, 750),
            budget_row("Roads", "Paving", 9000, 9000),
        ]))
    }

    #[tokio::test]
    async fn test_get_budget_orders_by_used() {
        let (status, _, body) = send(
            app(seeded(), None),
            post_json("/api/v1/get-budget", r#"{"department":"Parks","ward":"all"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        let rows = body["budgetData"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["account_budget_a"], "Maintenance");
        assert_eq!(rows[0]["used_amt"], 750.0);
        assert_eq!(rows[1]["account_budget_a"], "Lighting");
    }

    #[tokio::test]
    async fn test_unknown_department_is_empty() {
        let (status, _, body) = send(
            app(seeded(), None),
            post_json("/api/v1/get-budget", r#"{"department":"Library"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), serde_json::json!({ "budgetData": [] }));
    }

    #[tokio::test]
    async fn test_named_ward_does_not_filter() {
        let (status, _, body) = send(
            app(seeded(), None),
            post_json("/api/v1/get-budget", r#"{"department":"Parks","ward":"Ward 7"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["budgetData"].as_array().unwrap().len(), 2);
    }

    #[rstest]
    #[case(r#"{}"#)]
    #[case(r#"{"department":""}"#)]
    #[case(r#"{"department":"   ","ward":"all"}"#)]
    #[tokio::test]
    async fn test_department_required(#[case] payload: &str) {
        let (status, _, body) = send(
            app(seeded(), None),
            post_json("/api/v1/get-budget", payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"], "Department is required");
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let (status, _, body) = send(
            app(seeded(), None),
            post_json("/api/v1/get-budget", "{department:"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"], "Invalid JSON body");
    }

    #[tokio::test]
    async fn test_storage_failure() {
        let (status, _, body) = send(
            app(Arc::new(InMemoryBudgetStore::failing()), None),
            post_json("/api/v1/get-budget", r#"{"department":"Parks"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body), serde_json::json!({ "error": "Failed to fetch budget data" }));
    }

    #[tokio::test]
    async fn test_budget_table_html() {
        let request = Request::builder()
            .uri("/api/v1/budget-table?department=Parks")
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(app(seeded(), None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(
            headers[CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<h2>Budget Data - Parks</h2>"));
        assert!(html.contains("<td>Maintenance</td><td>$750</td><td>75.0%</td>"));
        assert!(html.contains("<td>Lighting</td><td>$250</td><td>25.0%</td>"));
    }

    #[tokio::test]
    async fn test_budget_table_json() {
        let request = Request::builder()
            .uri("/api/v1/budget-table?department=Roads&ward=all")
            .header("accept", "application/json")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(app(seeded(), None), request).await;

        assert_eq!(status, StatusCode::OK);
        let table = json(&body);
        assert_eq!(table["title"], "Budget Data - Roads");
        assert_eq!(table["caption"], "Municipal budget allocation by category");
        assert_eq!(table["lines"][0]["amount"], "$9,000");
        assert_eq!(table["lines"][0]["percentage"], "100.0%");
    }

    #[tokio::test]
    async fn test_budget_table_requires_department() {
        let request = Request::builder()
            .uri("/api/v1/budget-table")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(app(seeded(), None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_budget_table_bad_query_is_json_error() {
        let request = Request::builder()
            .uri("/api/v1/budget-table?department=Parks&department=Roads")
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(app(seeded(), None), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            headers[CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("application/json")
        );
        assert_eq!(json(&body), serde_json::json!({ "error": "Invalid query string" }));
    }
}
