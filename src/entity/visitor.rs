//! Visitor accounts. Visitors carry their vehicle description inline rather
//! than through the `vehicles` relation, and are exempt from the violation
//! gate and the vehicle/license activation prerequisites.

use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::account::AccountStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "visitors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub status: AccountStatus,
    pub plate_number: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_color: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
