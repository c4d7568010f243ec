//! Shared configuration, errors, and money formatting for CivicSpend.
//!
//! This crate provides common types used across all other crates:
//! - Application configuration loaded once at startup
//! - Application-wide error type with HTTP status mapping
//! - Currency and magnitude formatting for budget figures

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, InsightsConfig, ServerConfig};
pub use error::{AppError, AppResult};
pub use types::money::{fixed, format_magnitude, format_usd};
