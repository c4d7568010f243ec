//! JSON error envelope for handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use civicspend_core::budget::BudgetError;
use civicspend_core::insight::InsightError;
use civicspend_shared::AppError;
use serde::Serialize;
use tracing::{error, warn};

/// Handler error: an [`AppError`] rendered as `{error, details?}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    /// Client-facing message.
    pub error: &'a str,
    /// Raw upstream details, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a str>,
}

impl ApiError {
    /// 400 with `message`.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        Self(err.into())
    }
}

impl From<InsightError> for ApiError {
    fn from(err: InsightError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
        } else {
            warn!(code = self.0.error_code(), error = %self.0, "Request rejected");
        }

        let body = ErrorBody {
            error: self.0.client_message(),
            details: self.0.details(),
        };
        (status, Json(body)).into_response()
    }
}
