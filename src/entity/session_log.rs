//! Append-only audit log of session transitions. Rows are never updated or
//! deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The action a log row records, persisted with the facility's historical
/// wire spellings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum SessionAction {
    #[sea_orm(string_value = "TIME IN")]
    TimeIn,
    #[sea_orm(string_value = "TIME OUT")]
    TimeOut,
    #[sea_orm(string_value = "LATE TIME OUT")]
    LateTimeOut,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "session_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub session_id: i32,
    pub action: SessionAction,
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
