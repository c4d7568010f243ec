//! CivicSpend API Server
//!
//! Main entry point for the budget transparency backend.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use civicspend_api::{AppState, create_router};
use civicspend_core::insight::TextGenerator;
use civicspend_db::{MunicipalBudgetRepository, connect};
use civicspend_genai::GeminiClient;
use civicspend_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "civicspend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate()?;

    // Connect to database
    let db = connect(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    // Text generation is optional
    let generator: Option<Arc<dyn TextGenerator>> = match GeminiClient::from_config(&config.insights)? {
        Some(client) => {
            info!(model = %config.insights.model, "Insight generation configured");
            Some(Arc::new(client) as Arc<dyn TextGenerator>)
        }
        None => {
            warn!("No insights API key configured, /get-ai-insights will answer with a configuration error");
            None
        }
    };

    // Create application state
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(
        Arc::new(MunicipalBudgetRepository::new(db)),
        generator,
        Arc::new(config),
    );

    // Create router
    let app = create_router(state);

    // Start server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
