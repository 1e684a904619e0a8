//! RFID tokens. A token value is unique across the whole facility; exactly
//! one of the owner foreign keys is non-null per row, binding the token to a
//! user, premium, visitor, or vehicle record.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::account::AccountKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "rfid_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub value: String,
    /// Spendable balance. Non-negative; mutated only inside ledger
    /// transactions.
    #[sea_orm(column_type = "Decimal(Some((12, 4)))")]
    pub load_balance: Decimal,
    pub user_id: Option<i32>,
    pub premium_id: Option<i32>,
    pub visitor_id: Option<i32>,
    pub vehicle_id: Option<i32>,
}

/// Which record a token row is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerRef {
    Account(AccountKind, i32),
    /// Vehicle-bound tokens resolve to the vehicle's owning account.
    Vehicle(i32),
}

impl Model {
    /// The token's owner, probed in the fixed User → Premium → Visitor
    /// order (then vehicle binding). First non-null key is authoritative.
    pub fn owner(&self) -> Option<OwnerRef> {
        if let Some(id) = self.user_id {
            Some(OwnerRef::Account(AccountKind::User, id))
        } else if let Some(id) = self.premium_id {
            Some(OwnerRef::Account(AccountKind::Premium, id))
        } else if let Some(id) = self.visitor_id {
            Some(OwnerRef::Account(AccountKind::Visitor, id))
        } else {
            self.vehicle_id.map(OwnerRef::Vehicle)
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::premium::Entity",
        from = "Column::PremiumId",
        to = "super::premium::Column::Id"
    )]
    Premium,
    #[sea_orm(
        belongs_to = "super::visitor::Entity",
        from = "Column::VisitorId",
        to = "super::visitor::Column::Id"
    )]
    Visitor,
    #[sea_orm(
        belongs_to = "super::vehicle::Entity",
        from = "Column::VehicleId",
        to = "super::vehicle::Column::Id"
    )]
    Vehicle,
}

impl ActiveModelBehavior for ActiveModel {}
