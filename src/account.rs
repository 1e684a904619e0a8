//! Account kinds, per-kind policy, and the normalized account handle.
//!
//! The facility tracks three structurally similar account kinds — regular
//! users, premium users, and visitors — each persisted in its own table but
//! sharing one physical token namespace. All kind-specific behavior is
//! expressed as data in [`KindSpec`] rather than duplicated per-kind code
//! paths, and table routing is an explicit `match` on [`AccountKind`], never
//! built from runtime strings.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The three account kinds sharing the RFID token namespace.
///
/// Persisted as a string column on sessions, violations, and top-up history
/// so a single table can serve all three kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountKind {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "premium")]
    Premium,
    #[sea_orm(string_value = "visitor")]
    Visitor,
}

/// Lifecycle status of an account.
///
/// `Active` is only reachable through activation, which requires a funded
/// token and (for non-visitor kinds) a registered vehicle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountStatus {
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Inactive")]
    Inactive,
    #[sea_orm(string_value = "MissingDetails")]
    MissingDetails,
}

/// Static per-kind policy record.
///
/// Resolved at compile time via [`AccountKind::spec`] — never assembled from
/// request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSpec {
    /// Activation requires at least one registered vehicle.
    pub requires_vehicle: bool,
    /// Activation requires a driver's license on file.
    pub requires_license: bool,
    /// Check-in is refused once unresolved violations reach the limit.
    /// Visitors are exempt by policy: no violation accrual is wired for
    /// visitor sessions.
    pub violation_gated: bool,
}

const USER_SPEC: KindSpec = KindSpec {
    requires_vehicle: true,
    requires_license: true,
    violation_gated: true,
};

const VISITOR_SPEC: KindSpec = KindSpec {
    requires_vehicle: false,
    requires_license: false,
    violation_gated: false,
};

impl AccountKind {
    /// Token-resolution probe order. A token value is unique system-wide, so
    /// at most one kind should ever match; this order is the defined
    /// tie-break and must not change.
    pub const PROBE_ORDER: [AccountKind; 3] =
        [AccountKind::User, AccountKind::Premium, AccountKind::Visitor];

    /// The policy record for this kind.
    pub const fn spec(self) -> &'static KindSpec {
        match self {
            AccountKind::User | AccountKind::Premium => &USER_SPEC,
            AccountKind::Visitor => &VISITOR_SPEC,
        }
    }
}

/// Normalized view of whichever account kind owns a token.
///
/// Produced by [`crate::AccountResolver::resolve`]; carries everything the
/// swipe path needs without another round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountHandle {
    pub kind: AccountKind,
    pub account_id: i32,
    /// "First Last", for operator-facing messages.
    pub display_name: String,
    /// Current balance joined from the owning token record.
    pub load_balance: Decimal,
    pub status: AccountStatus,
}
