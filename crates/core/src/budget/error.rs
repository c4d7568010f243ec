//! Budget error types.

use civicspend_shared::AppError;
use thiserror::Error;

/// Failures of the CSV normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The upload contained no header line.
    #[error("CSV file is empty")]
    Empty,

    /// The header lacks one or more required columns.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The header line could not be read.
    #[error("Malformed CSV header: {0}")]
    MalformedHeader(String),

    /// Every data line was skipped.
    #[error("No valid rows found in CSV")]
    NoValidRows,
}

/// Failure reported by a [`BudgetStore`](super::BudgetStore) implementation.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

impl StoreError {
    /// Wraps any displayable driver error.
    pub fn new(cause: impl ToString) -> Self {
        Self(cause.to_string())
    }
}

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// The query did not name a department.
    #[error("Department is required")]
    DepartmentRequired,

    /// The uploaded CSV was rejected.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Reading rows from storage failed.
    #[error("Failed to fetch budget data: {0}")]
    Fetch(StoreError),

    /// Bulk insert failed.
    #[error("Failed to insert budget data: {0}")]
    Insert(StoreError),
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::DepartmentRequired => {
                Self::Validation("Department is required".to_string())
            }
            BudgetError::Import(import) => Self::Validation(import.to_string()),
            BudgetError::Fetch(cause) => Self::storage("Failed to fetch budget data", cause),
            BudgetError::Insert(cause) => Self::storage("Failed to insert budget data", cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = ImportError::MissingColumns(vec!["glcode".into(), "used_amt".into()]);
        assert_eq!(err.to_string(), "Missing required columns: glcode, used_amt");
    }

    #[test]
    fn test_app_error_mapping() {
        let err: AppError = BudgetError::DepartmentRequired.into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.client_message(), "Department is required");

        let err: AppError = BudgetError::Import(ImportError::NoValidRows).into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.client_message(), "No valid rows found in CSV");

        let err: AppError = BudgetError::Fetch(StoreError::new("connection reset")).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.client_message(), "Failed to fetch budget data");

        let err: AppError = BudgetError::Insert(StoreError::new("duplicate key")).into();
        assert_eq!(err.client_message(), "Failed to insert budget data");
        assert!(err.to_string().contains("duplicate key"));
    }
}
