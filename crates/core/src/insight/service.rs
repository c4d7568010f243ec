//! Insight service: validates a request, builds the prompt and relays it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::error::{GenerationError, InsightError};
use super::prompt::build_prompt;
use super::types::InsightRequest;

/// Reply used when the generator answers without any text.
pub const NO_INSIGHTS: &str = "No insights returned.";

/// Seam for the external text generation service.
///
/// Implemented by the genai crate; tests use stubs.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` and returns the first candidate's text, if any.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GenerationError>;
}

/// Turns insight requests into generated text.
#[derive(Clone)]
pub struct InsightService {
    generator: Option<Arc<dyn TextGenerator>>,
    max_prompt_rows: usize,
}

impl InsightService {
    /// Creates the service. `generator` is `None` when no API key is configured.
    #[must_use]
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, max_prompt_rows: usize) -> Self {
        Self {
            generator,
            max_prompt_rows,
        }
    }

    /// Whether a text generator is available.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Validates `request`, builds the prompt and asks the generator for a summary.
    ///
    /// Input is checked before configuration so a bad request never
    /// reaches the external service.
    pub async fn generate(&self, request: InsightRequest) -> Result<String, InsightError> {
        let department = request
            .department
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or(InsightError::MissingInput)?;
        let rows = request
            .budget_data
            .as_deref()
            .filter(|rows| !rows.is_empty())
            .ok_or(InsightError::MissingInput)?;

        let Some(generator) = &self.generator else {
            warn!("Insight requested but no text generator is configured");
            return Err(InsightError::NotConfigured);
        };

        let instructions = request.style.unwrap_or_default();
        let prompt = build_prompt(department, rows, instructions, self.max_prompt_rows);
        info!(
            %department,
            ?instructions,
            rows = rows.len(),
            rows_omitted = prompt.rows_omitted,
            prompt_len = prompt.text.len(),
            "Requesting budget insights"
        );

        match generator.generate(&prompt.text).await {
            Ok(Some(text)) => Ok(text),
            Ok(None) => {
                debug!("Text generator returned no candidate text");
                Ok(NO_INSIGHTS.to_string())
            }
            Err(err) => {
                warn!(error = %err, "Text generation failed");
                Err(err.into())
            }
        }
    }
}
