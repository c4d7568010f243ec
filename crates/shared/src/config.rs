//! Application configuration management.

use std::fmt;

use serde::Deserialize;

use crate::error::AppError;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Generative-text (insight) configuration.
    #[serde(default)]
    pub insights: InsightsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for multipart CSV uploads, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Generative-text API configuration.
///
/// The API key is optional: without it the server still serves budget
/// queries and imports, and the insight endpoint reports a configuration
/// error.
#[derive(Clone, Deserialize)]
pub struct InsightsConfig {
    /// API key for the text-generation service.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the text-generation API.
    #[serde(default = "default_insights_base_url")]
    pub base_url: String,
    /// Model name used for `generateContent`.
    #[serde(default = "default_insights_model")]
    pub model: String,
    /// Maximum number of line items embedded in one prompt.
    #[serde(default = "default_max_prompt_rows")]
    pub max_prompt_rows: usize,
    /// Optional request timeout in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_insights_base_url(),
            model: default_insights_model(),
            max_prompt_rows: default_max_prompt_rows(),
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for InsightsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_prompt_rows", &self.max_prompt_rows)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_insights_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_insights_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_max_prompt_rows() -> usize {
    100
}

impl InsightsConfig {
    /// Returns the API key when one is configured and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest priority first: `config/default`, `config/{RUN_MODE}`,
    /// then `CIVICSPEND__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CIVICSPEND").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Checks invariants that deserialization alone cannot express.
    ///
    /// Called once at startup. A missing insights API key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` describing the first violation.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.url.trim().is_empty() {
            return Err(AppError::Configuration(
                "database.url must not be empty".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::Configuration(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }
        if self.insights.max_prompt_rows == 0 {
            return Err(AppError::Configuration(
                "insights.max_prompt_rows must be greater than zero".to_string(),
            ));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(AppError::Configuration(
                "server.max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
