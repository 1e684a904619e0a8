//! Premium account holders. Structurally identical to `users`; premium
//! standing lives in which table the row sits in, matching the facility's
//! billing split.

use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::account::AccountStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "premiums")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub status: AccountStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
