//! Shared fixtures for router tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
};
use civicspend_core::budget::{BudgetRow, InMemoryBudgetStore};
use civicspend_core::insight::{GenerationError, TextGenerator};
use civicspend_shared::{AppConfig, DatabaseConfig, InsightsConfig, ServerConfig};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{AppState, create_router};

/// Text generator that returns a canned reply and counts calls.
pub struct StubGenerator {
    reply: Result<Option<String>, GenerationError>,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn replying(reply: Result<Option<String>, GenerationError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://localhost/civicspend_test".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        insights: InsightsConfig::default(),
    }
}

pub fn app(store: Arc<InMemoryBudgetStore>, generator: Option<Arc<StubGenerator>>) -> Router {
    app_with_config(store, generator, test_config())
}

pub fn app_with_config(
    store: Arc<InMemoryBudgetStore>,
    generator: Option<Arc<StubGenerator>>,
    config: AppConfig,
) -> Router {
    let generator = generator.map(|g| g as Arc<dyn TextGenerator>);
    create_router(AppState::new(store, generator, Arc::new(config)))
}

pub fn budget_row(department: &str, label: &str, allocated: i64, used: i64) -> BudgetRow {
    BudgetRow {
        id: Uuid::new_v4(),
        account: department.to_string(),
        glcode: "100".to_string(),
        account_budget_a: label.to_string(),
        budget_a: Decimal::from(allocated),
        used_amt: Decimal::from(used),
        remaining_amt: Decimal::from(allocated - used),
    }
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body)
}

pub fn json(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
