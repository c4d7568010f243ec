//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed required input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required external credential or setting is unavailable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Query or insert failure at the data store.
    #[error("Storage error: {message}: {cause}")]
    Storage {
        /// Message safe to show to clients.
        message: String,
        /// Underlying driver error, for logs only.
        cause: String,
    },

    /// The external text-generation service failed or answered garbage.
    #[error("Upstream error (status {status}): {message}")]
    Upstream {
        /// Status reported by the upstream service.
        status: u16,
        /// Message safe to show to clients.
        message: String,
        /// Raw upstream body, surfaced for diagnostics.
        details: Option<String>,
    },

    /// Uncaught failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a storage error from a client-facing message and its cause.
    pub fn storage(message: impl Into<String>, cause: impl ToString) -> Self {
        Self::Storage {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Upstream errors mirror the upstream status when it is an error code.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Upstream { status, .. } if *status >= 400 && *status <= 599 => *status,
            Self::Configuration(_)
            | Self::Storage { .. }
            | Self::Upstream { .. }
            | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses and logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Storage { .. } => "STORAGE_ERROR",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message a client is allowed to see.
    ///
    /// Storage causes and internal details stay in the logs.
    #[must_use]
    pub fn client_message(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::Configuration(msg) => msg.as_str(),
            Self::Storage { message, .. } | Self::Upstream { message, .. } => message.as_str(),
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns diagnostic details that may be forwarded to the client.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Upstream { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}
