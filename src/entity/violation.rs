//! Violations accrued by accounts, created by the session engine on late
//! checkout. Status is mutated only through the review endpoint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::account::AccountKind;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ViolationStatus {
    #[sea_orm(string_value = "Unresolved")]
    Unresolved,
    #[sea_orm(string_value = "Resolved")]
    Resolved,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "violations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: AccountKind,
    pub account_id: i32,
    /// The session whose checkout triggered this violation, when known.
    pub session_id: Option<i32>,
    pub notes: String,
    pub status: ViolationStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parking_session::Entity",
        from = "Column::SessionId",
        to = "super::parking_session::Column::Id"
    )]
    Session,
}

impl Related<super::parking_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
