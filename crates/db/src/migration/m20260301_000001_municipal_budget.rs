//! Municipal budget migration.
//!
//! Creates the table that CSV imports append to and department queries read.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(MUNICIPAL_BUDGET_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS municipal_budget CASCADE;")
            .await?;
        Ok(())
    }
}

const MUNICIPAL_BUDGET_SQL: &str = r"
-- One row per imported budget line item
CREATE TABLE municipal_budget (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account TEXT NOT NULL,
    glcode TEXT NOT NULL,
    account_budget_a TEXT NOT NULL DEFAULT '',
    budget_a NUMERIC(18, 2) NOT NULL DEFAULT 0,
    used_amt NUMERIC(18, 2) NOT NULL DEFAULT 0,
    remaining_amt NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Department lookup, highest spending first
CREATE INDEX idx_municipal_budget_account_used ON municipal_budget(account, used_amt DESC);
";
