//! Budget data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::BudgetError;

/// A stored budget line item, as returned by the query gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRow {
    /// Identifier assigned by storage.
    pub id: Uuid,
    /// Department (category) the line item belongs to.
    pub account: String,
    /// General-ledger code.
    pub glcode: String,
    /// Display label for the line item.
    pub account_budget_a: String,
    /// Allocated amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub budget_a: Decimal,
    /// Amount spent. May exceed the allocation.
    #[serde(with = "rust_decimal::serde::float")]
    pub used_amt: Decimal,
    /// Amount left, tracked independently of `budget_a - used_amt`.
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_amt: Decimal,
}

/// A normalized CSV record ready for bulk insert.
///
/// `account_budget_a` carries the figure read from the CSV `budget_a`
/// column; storage writes it to both the allocation and the label column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBudgetRow {
    /// Department (category), never empty.
    pub account: String,
    /// General-ledger code, never empty.
    pub glcode: String,
    /// Allocated amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub account_budget_a: Decimal,
    /// Amount spent.
    #[serde(with = "rust_decimal::serde::float")]
    pub used_amt: Decimal,
    /// Amount left.
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_amt: Decimal,
}

impl NewBudgetRow {
    /// Label stored alongside the row: the allocation figure as text.
    #[must_use]
    pub fn label(&self) -> String {
        self.account_budget_a.normalize().to_string()
    }
}

/// Raw query body: `{department, ward?}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetQuery {
    /// Department to fetch.
    #[serde(default)]
    pub department: Option<String>,
    /// Ward to narrow by. Accepted but not applied yet.
    #[serde(default)]
    pub ward: Option<String>,
}

/// Ward selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ward {
    /// Every ward.
    All,
    /// A specific ward. Currently has no filtering effect.
    Named(String),
}

impl Ward {
    /// Absent, empty and `"all"` select every ward.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("" | "all") => Self::All,
            Some(name) => Self::Named(name.to_string()),
        }
    }
}

/// A validated department query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentFilter {
    /// Department matched exactly against `account`.
    pub department: String,
    /// Ward selector.
    pub ward: Ward,
}

impl TryFrom<BudgetQuery> for DepartmentFilter {
    type Error = BudgetError;

    fn try_from(query: BudgetQuery) -> Result<Self, Self::Error> {
        let department = query
            .department
            .filter(|d| !d.trim().is_empty())
            .ok_or(BudgetError::DepartmentRequired)?;

        Ok(Self {
            department,
            ward: Ward::parse(query.ward.as_deref()),
        })
    }
}
