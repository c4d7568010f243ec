//! In-memory [`BudgetStore`] for tests and local dry runs.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::error::StoreError;
use super::service::BudgetStore;
use super::types::{BudgetRow, NewBudgetRow};

/// A `BudgetStore` holding rows in process memory.
#[derive(Debug, Default)]
pub struct InMemoryBudgetStore {
    rows: Mutex<Vec<BudgetRow>>,
    failing: bool,
}

impl InMemoryBudgetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `rows`.
    #[must_use]
    pub fn with_rows(rows: Vec<BudgetRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            failing: false,
        }
    }

    /// Creates a store whose every operation fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    /// Returns a copy of everything stored.
    pub fn snapshot(&self) -> Result<Vec<BudgetRow>, StoreError> {
        self.rows
            .lock()
            .map(|rows| rows.clone())
            .map_err(StoreError::new)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::new("store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl BudgetStore for InMemoryBudgetStore {
    async fn rows_for_department(&self, department: &str) -> Result<Vec<BudgetRow>, StoreError> {
        self.check()?;
        let mut matching: Vec<BudgetRow> = self
            .snapshot()?
            .into_iter()
            .filter(|row| row.account == department)
            .collect();
        matching.sort_by(|a, b| b.used_amt.cmp(&a.used_amt));
        Ok(matching)
    }

    async fn insert_rows(&self, rows: &[NewBudgetRow]) -> Result<u64, StoreError> {
        self.check()?;
        let mut stored = self.rows.lock().map_err(StoreError::new)?;
        stored.extend(rows.iter().map(|row| BudgetRow {
            id: Uuid::new_v4(),
            account: row.account.clone(),
            glcode: row.glcode.clone(),
            account_budget_a: row.label(),
            budget_a: row.account_budget_a,
            used_amt: row.used_amt,
            remaining_amt: row.remaining_amt,
        }));
        Ok(rows.len() as u64)
    }
}
