//! Request extractors.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// Message for any body that is not valid JSON for the endpoint.
pub const INVALID_JSON: &str = "Invalid JSON body";

/// JSON body that rejects with `400 {"error": "Invalid JSON body"}`.
///
/// Unlike `axum::Json` the `Content-Type` header is not checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            debug!(%rejection, "Failed to read request body");
            ApiError::validation(INVALID_JSON)
        })?;

        serde_json::from_slice(&bytes).map(Self).map_err(|err| {
            debug!(error = %err, "Rejected request body");
            ApiError::validation(INVALID_JSON)
        })
    }
}
