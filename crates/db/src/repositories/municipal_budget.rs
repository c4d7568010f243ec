//! Municipal budget repository.
//!
//! Implements the core [`BudgetStore`] seam using SeaORM.

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::municipal_budget;
use civicspend_core::budget::{BudgetRow, BudgetStore, NewBudgetRow, StoreError};

/// Postgres-backed budget store.
#[derive(Debug, Clone)]
pub struct MunicipalBudgetRepository {
    db: DatabaseConnection,
}

impl MunicipalBudgetRepository {
    /// Creates a new repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BudgetStore for MunicipalBudgetRepository {
    async fn rows_for_department(&self, department: &str) -> Result<Vec<BudgetRow>, StoreError> {
        let models = municipal_budget::Entity::find()
            .filter(municipal_budget::Column::Account.eq(department))
            .order_by_desc(municipal_budget::Column::UsedAmt)
            .all(&self.db)
            .await
            .map_err(StoreError::new)?;

        debug!(%department, rows = models.len(), "Loaded municipal budget rows");
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn insert_rows(&self, rows: &[NewBudgetRow]) -> Result<u64, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let models = rows.iter().map(to_active_model);
        let inserted = municipal_budget::Entity::insert_many(models)
            .exec_without_returning(&self.db)
            .await
            .map_err(StoreError::new)?;

        debug!(inserted, "Inserted municipal budget rows");
        Ok(inserted)
    }
}

/// The label column keeps the original figure as text; `budget_a` holds it as a number.
fn to_active_model(row: &NewBudgetRow) -> municipal_budget::ActiveModel {
    municipal_budget::ActiveModel {
        id: Set(Uuid::new_v4()),
        account: Set(row.account.clone()),
        glcode: Set(row.glcode.clone()),
        account_budget_a: Set(row.label()),
        budget_a: Set(row.account_budget_a),
        used_amt: Set(row.used_amt),
        remaining_amt: Set(row.remaining_amt),
        created_at: NotSet,
    }
}

fn to_domain(model: municipal_budget::Model) -> BudgetRow {
    BudgetRow {
        id: model.id,
        account: model.account,
        glcode: model.glcode,
        account_budget_a: model.account_budget_a,
        budget_a: model.budget_a,
        used_amt: model.used_amt,
        remaining_amt: model.remaining_amt,
    }
}
