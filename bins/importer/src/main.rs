//! Command-line CSV importer.
//!
//! Runs the same normalizer as `POST /api/v1/import-csv` against a local
//! file and appends the rows to `municipal_budget`.
//!
//! Usage:
//!   importer budget.csv            - Import the file
//!   importer budget.csv --dry-run  - Only report what would be imported

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use civicspend_core::budget::{BudgetService, ImportSummary, InMemoryBudgetStore};
use civicspend_db::{MunicipalBudgetRepository, connect};
use civicspend_shared::{AppConfig, AppError};

#[derive(Parser)]
#[command(name = "importer")]
#[command(about = "Import a municipal budget CSV into CivicSpend")]
#[command(version)]
struct Cli {
    /// Path to the CSV file
    file: PathBuf,

    /// Parse and report without writing to the database
    #[arg(long)]
    dry_run: bool,
}

/// Runs the full import against an in-memory store.
async fn dry_run(content: &str) -> Result<ImportSummary, AppError> {
    let service = BudgetService::new(Arc::new(InMemoryBudgetStore::new()));
    Ok(service.import_csv(content).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "civicspend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let content = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;

    if cli.dry_run {
        let summary = dry_run(&content).await?;
        println!(
            "{} rows would be imported ({} lines skipped, {} amounts defaulted to 0)",
            summary.records_imported, summary.skipped_rows, summary.defaulted_amounts
        );
        return Ok(());
    }

    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate()?;
    let db = connect(&config.database).await?;
    info!("Connected to database");

    let service = BudgetService::new(Arc::new(MunicipalBudgetRepository::new(db)));
    let summary = service
        .import_csv(&content)
        .await
        .map_err(AppError::from)?;

    println!("{}", summary.message);
    if summary.skipped_rows > 0 || summary.defaulted_amounts > 0 {
        println!(
            "{} lines skipped, {} amounts defaulted to 0",
            summary.skipped_rows, summary.defaulted_amounts
        );
    }
    Ok(())
}
