//! CSV import route.

use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    routing::post,
};
use civicspend_core::budget::ImportSummary;
use tracing::{debug, info};

use crate::{AppState, error::ApiError};

/// Multipart field carrying the CSV.
const FILE_FIELD: &str = "file";

/// Creates the import routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/import-csv", post(import_csv))
}

/// Reads the `file` field as UTF-8 text, or `None` when the form has none.
async fn read_csv_field(multipart: &mut Multipart) -> Result<Option<String>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        debug!(error = %err, "Malformed multipart body");
        ApiError::validation("Failed to read uploaded file")
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|err| {
            debug!(error = %err, "Failed to read file field");
            ApiError::validation("Failed to read uploaded file")
        })?;
        info!(file_name = ?file_name, bytes = bytes.len(), "Received CSV upload");

        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| ApiError::validation("CSV file must be UTF-8 text"))?;
        return Ok(Some(text));
    }
    Ok(None)
}

/// POST `/import-csv` - normalize an uploaded CSV and append its rows.
async fn import_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImportSummary>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!(%rejection, "Import request is not multipart");
        ApiError::validation("No CSV file provided")
    })?;

    let content = read_csv_field(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::validation("No CSV file provided"))?;

    let summary = state.budgets.import_csv(&content).await?;
    Ok(Json(summary))
}
