//! Budget service: CSV import and the department query gateway.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use super::error::{BudgetError, StoreError};
use super::import::normalize_csv;
use super::types::{BudgetRow, DepartmentFilter, NewBudgetRow, Ward};

/// Persistence seam for the `municipal_budget` table.
///
/// This trait is implemented by the db crate to provide actual database operations.
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Returns every row whose `account` equals `department`,
    /// ordered by `used_amt` descending.
    async fn rows_for_department(&self, department: &str) -> Result<Vec<BudgetRow>, StoreError>;

    /// Appends `rows` in a single bulk insert and returns how many were written.
    async fn insert_rows(&self, rows: &[NewBudgetRow]) -> Result<u64, StoreError>;
}

/// Outcome of a successful CSV import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Human-readable result line.
    pub message: String,
    /// Rows written to storage.
    pub records_imported: usize,
    /// Data lines dropped by the normalizer.
    pub skipped_rows: usize,
    /// Amount cells that defaulted to zero.
    pub defaulted_amounts: usize,
}

/// Budget service for importing and querying line items.
#[derive(Clone)]
pub struct BudgetService {
    store: Arc<dyn BudgetStore>,
}

impl BudgetService {
    /// Creates a new budget service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn BudgetStore>) -> Self {
        Self { store }
    }

    /// Fetches a department's line items, highest usage first.
    ///
    /// A named ward is accepted but does not filter anything yet.
    /// No matching rows is an empty result, not an error.
    pub async fn fetch(&self, filter: &DepartmentFilter) -> Result<Vec<BudgetRow>, BudgetError> {
        info!(department = %filter.department, ward = ?filter.ward, "Fetching budget data");

        if let Ward::Named(ward) = &filter.ward {
            warn!(%ward, "Ward filtering not implemented yet, returning all wards");
        }

        let mut rows = self
            .store
            .rows_for_department(&filter.department)
            .await
            .map_err(BudgetError::Fetch)?;

        rows.sort_by(|a, b| b.used_amt.cmp(&a.used_amt));
        Ok(rows)
    }

    /// Normalizes an uploaded CSV and appends the rows in one bulk insert.
    ///
    /// Nothing is written when normalization fails.
    pub async fn import_csv(&self, content: &str) -> Result<ImportSummary, BudgetError> {
        let import = normalize_csv(content)?;
        info!(
            records = import.rows.len(),
            skipped = import.skipped_rows,
            defaulted = import.defaulted_amounts,
            "Parsed budget records"
        );
        if import.skipped_rows > 0 || import.defaulted_amounts > 0 {
            warn!(
                skipped = import.skipped_rows,
                defaulted = import.defaulted_amounts,
                "CSV contained lines or amounts that were not imported as written"
            );
        }

        self.store
            .insert_rows(&import.rows)
            .await
            .map_err(BudgetError::Insert)?;

        let records_imported = import.rows.len();
        Ok(ImportSummary {
            message: format!("Successfully imported {records_imported} budget records"),
            records_imported,
            skipped_rows: import.skipped_rows,
            defaulted_amounts: import.defaulted_amounts,
        })
    }
}
