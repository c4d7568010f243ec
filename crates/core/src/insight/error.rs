//! Insight error types.

use civicspend_shared::AppError;
use thiserror::Error;

/// Failure reported by a [`TextGenerator`](super::TextGenerator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The service answered with a non-success status.
    #[error("text generation failed with status {status}")]
    Status {
        /// HTTP status returned.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The service answered 2xx with a body that is not the expected JSON.
    #[error("text generation returned malformed JSON")]
    MalformedResponse {
        /// Raw response body.
        body: String,
    },

    /// The request never completed.
    #[error("text generation request failed: {0}")]
    Transport(String),

    /// The configured timeout elapsed.
    #[error("text generation request timed out")]
    Timeout,
}

/// Insight-related errors.
#[derive(Debug, Error)]
pub enum InsightError {
    /// Department or rows are missing.
    #[error("Budget data and department are required")]
    MissingInput,

    /// No text generator is configured.
    #[error("Text generation API key not configured")]
    NotConfigured,

    /// The text generator failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl From<InsightError> for AppError {
    fn from(err: InsightError) -> Self {
        match err {
            InsightError::MissingInput => {
                Self::Validation("Budget data and department are required".to_string())
            }
            InsightError::NotConfigured => {
                Self::Configuration("Text generation API key not configured".to_string())
            }
            InsightError::Generation(GenerationError::Status { status, body }) => Self::Upstream {
                status,
                message: "Failed to get AI insights".to_string(),
                details: Some(body),
            },
            InsightError::Generation(GenerationError::MalformedResponse { body }) => {
                Self::Upstream {
                    status: 500,
                    message: "Invalid JSON from text generation service".to_string(),
                    details: Some(body),
                }
            }
            InsightError::Generation(e @ (GenerationError::Transport(_) | GenerationError::Timeout)) => {
                Self::Upstream {
                    status: 500,
                    message: "Failed to get AI insights".to_string(),
                    details: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_and_configuration_mapping() {
        let err: AppError = InsightError::MissingInput.into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.client_message(), "Budget data and department are required");

        let err: AppError = InsightError::NotConfigured.into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_upstream_status_and_body_are_surfaced() {
        let err: AppError = InsightError::from(GenerationError::Status {
            status: 429,
            body: "{\"error\":{\"code\":429}}".into(),
        })
        .into();
        assert_eq!(err.status_code(), 429);
        assert_eq!(err.details(), Some("{\"error\":{\"code\":429}}"));
    }

    #[test]
    fn test_malformed_body_is_500_with_details() {
        let err: AppError = InsightError::from(GenerationError::MalformedResponse {
            body: "<html>".into(),
        })
        .into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.details(), Some("<html>"));
    }

    #[test]
    fn test_timeout_is_500() {
        let err: AppError = InsightError::from(GenerationError::Timeout).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.details(), Some("text generation request timed out"));
    }
}
