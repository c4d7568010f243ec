//! Presentation views over fetched budget rows.

pub mod table;

pub use table::{BudgetTable, TableLine, share_percent};
