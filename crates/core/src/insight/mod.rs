//! Natural-language budget insights.
//!
//! Rows supplied by the client are validated into [`InsightRow`]s, turned
//! into one bounded prompt by [`build_prompt`], and handed to whatever
//! [`TextGenerator`] is configured.

pub mod error;
pub mod prompt;
pub mod service;
pub mod types;

pub use error::{GenerationError, InsightError};
pub use prompt::{Prompt, PromptTotals, build_prompt};
pub use service::{InsightService, NO_INSIGHTS, TextGenerator};
pub use types::{InsightRequest, InsightRow, Instructions};
