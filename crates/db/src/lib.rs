//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - The `municipal_budget` entity
//! - [`MunicipalBudgetRepository`], the Postgres-backed budget store
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::MunicipalBudgetRepository;

use std::time::Duration;

use civicspend_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}
