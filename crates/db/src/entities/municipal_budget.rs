//! `SeaORM` Entity for the municipal_budget table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "municipal_budget")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account: String,
    pub glcode: String,
    pub account_budget_a: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub budget_a: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub used_amt: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub remaining_amt: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
