//! Department budget table.
//!
//! One line per budget row: category label, amount spent and that amount's
//! share of the department's total spending.

use civicspend_shared::{fixed, format_usd};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::budget::BudgetRow;

/// Caption shown under every table.
pub const CAPTION: &str = "Municipal budget allocation by category";

/// A rendered table line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLine {
    /// Row id, used as a stable key by clients.
    pub id: Uuid,
    /// Category label (`account_budget_a`).
    pub category: String,
    /// Amount spent, formatted as US dollars.
    pub amount: String,
    /// Share of total spending, e.g. `"25.0%"`.
    pub percentage: String,
}

/// Budget table for one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetTable {
    /// `Budget Data - {department}`.
    pub title: String,
    /// Fixed caption.
    pub caption: String,
    /// Lines in the order the rows were given.
    pub lines: Vec<TableLine>,
}

/// `part` as a percentage of `total`, one decimal place.
///
/// Returns `"0"` when `total` is not positive.
#[must_use]
pub fn share_percent(part: Decimal, total: Decimal) -> String {
    if total <= Decimal::ZERO {
        return "0".to_string();
    }
    part.checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or_else(|| "0".to_string(), |pct| fixed(pct, 1))
}

impl BudgetTable {
    /// Builds the table for `department` from already-ordered rows.
    #[must_use]
    pub fn build(department: &str, rows: &[BudgetRow]) -> Self {
        let total = rows
            .iter()
            .fold(Decimal::ZERO, |acc, row| acc.saturating_add(row.used_amt));
        let lines = rows
            .iter()
            .map(|row| TableLine {
                id: row.id,
                category: row.account_budget_a.clone(),
                amount: format_usd(row.used_amt),
                percentage: format!("{}%", share_percent(row.used_amt, total)),
            })
            .collect();

        Self {
            title: format!("Budget Data - {department}"),
            caption: CAPTION.to_string(),
            lines,
        }
    }

    /// Renders the table as an HTML fragment. All text is escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(256 + self.lines.len() * 96);
        html.push_str("<section class=\"budget-table\">\n");
        html.push_str(&format!("  <h2>{}</h2>\n", escape_html(&self.title)));
        html.push_str("  <table>\n");
        html.push_str(&format!(
            "    <caption>{}</caption>\n",
            escape_html(&self.caption)
        ));
        html.push_str(
            "    <thead><tr><th>Category</th><th>Amount</th><th>Percentage</th></tr></thead>\n",
        );
        html.push_str("    <tbody>\n");
        for line in &self.lines {
            html.push_str(&format!(
                "      <tr data-id=\"{}\"><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                line.id,
                escape_html(&line.category),
                escape_html(&line.amount),
                escape_html(&line.percentage),
            ));
        }
        html.push_str("    </tbody>\n  </table>\n</section>\n");
        html
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
