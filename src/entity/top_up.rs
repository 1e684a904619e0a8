//! Append-only history of balance top-ups, one row per funding event.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::account::AccountKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "top_up_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: AccountKind,
    pub account_id: i32,
    /// Operator (guard/BAO) who performed the top-up.
    pub operator_id: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 4)))")]
    pub load_amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
