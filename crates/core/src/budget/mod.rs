//! Budget line items: import, storage seam, and department queries.

pub mod error;
pub mod import;
pub mod memory;
pub mod service;
pub mod types;


pub use error::{BudgetError, ImportError, StoreError};
pub use import::{CsvImport, REQUIRED_COLUMNS, normalize_csv, parse_amount};
pub use memory::InMemoryBudgetStore;
pub use service::{BudgetService, BudgetStore, ImportSummary};
pub use types::{BudgetQuery, BudgetRow, DepartmentFilter, NewBudgetRow, Ward};
