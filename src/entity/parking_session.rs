//! Parking sessions. One row per open-to-close interval; `time_out` null
//! means the session is still open. At most one open session exists per
//! account, enforced by the engine's transaction-scoped check-then-act.

use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::account::AccountKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "parking_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: AccountKind,
    pub account_id: i32,
    /// Operator who opened the session at check-in.
    pub guard_id: i32,
    pub time_in: DateTimeWithTimeZone,
    pub time_out: Option<DateTimeWithTimeZone>,
    /// Whole minutes between time_in and time_out; set at checkout.
    pub duration_minutes: Option<i64>,
}

impl Model {
    pub fn is_open(&self) -> bool {
        self.time_out.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session_log::Entity")]
    Logs,
}

impl Related<super::session_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Logs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
