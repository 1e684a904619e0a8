//! Violation accrual, counting, and review.

use chrono::Local;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, Set,
};
use tracing::info;

use crate::account::AccountKind;
use crate::entity::violation::{self, ViolationStatus};
use crate::error::{Error, Result};

/// Records and counts unresolved infractions per account.
///
/// The tracker itself is policy-free: the check-in gate (refusing entry at
/// three unresolved violations, non-visitor kinds only) lives in the session
/// engine, which calls [`ViolationTracker::unresolved_count`] before opening
/// a session.
#[derive(Debug, Clone)]
pub struct ViolationTracker {
    conn: DatabaseConnection,
}

impl ViolationTracker {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Number of `Unresolved` violations on the account.
    pub async fn unresolved_count(&self, kind: AccountKind, account_id: i32) -> Result<u64> {
        unresolved_count_on(&self.conn, kind, account_id).await
    }

    /// Appends a violation row, optionally referencing the session whose
    /// checkout triggered it. Returns the new violation id.
    pub async fn record(
        &self,
        kind: AccountKind,
        account_id: i32,
        session_id: Option<i32>,
        notes: &str,
    ) -> Result<i32> {
        record_on(&self.conn, kind, account_id, session_id, notes).await
    }

    /// The review endpoint: a pure status transition with no cascading
    /// effects. Resolving a violation lowers the unresolved count and can
    /// re-open the check-in gate.
    pub async fn review(&self, violation_id: i32, new_status: ViolationStatus) -> Result<()> {
        let row = violation::Entity::find_by_id(violation_id)
            .one(&self.conn)
            .await?
            .ok_or(Error::NotFound)?;

        let mut active = row.into_active_model();
        active.status = Set(new_status);
        active.update(&self.conn).await?;

        info!(violation_id, ?new_status, "violation reviewed");
        Ok(())
    }
}

pub(crate) async fn unresolved_count_on<C: ConnectionTrait>(
    conn: &C,
    kind: AccountKind,
    account_id: i32,
) -> Result<u64> {
    Ok(violation::Entity::find()
        .filter(violation::Column::Kind.eq(kind))
        .filter(violation::Column::AccountId.eq(account_id))
        .filter(violation::Column::Status.eq(ViolationStatus::Unresolved))
        .count(conn)
        .await?)
}

pub(crate) async fn record_on<C: ConnectionTrait>(
    conn: &C,
    kind: AccountKind,
    account_id: i32,
    session_id: Option<i32>,
    notes: &str,
) -> Result<i32> {
    let row = violation::ActiveModel {
        kind: Set(kind),
        account_id: Set(account_id),
        session_id: Set(session_id),
        notes: Set(notes.to_owned()),
        status: Set(ViolationStatus::Unresolved),
        created_at: Set(Local::now().fixed_offset()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    info!(?kind, account_id, session_id, violation_id = row.id, "violation recorded");
    Ok(row.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_user, setup_test_db};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn counts_only_unresolved_rows_for_the_account() {
        let conn = setup_test_db().await;
        let user = seed_user(&conn, "Ana", "Reyes", "GP-1", Decimal::ZERO).await;
        let other = seed_user(&conn, "Ben", "Cruz", "GP-2", Decimal::ZERO).await;
        let tracker = ViolationTracker::new(conn);

        let first = tracker
            .record(AccountKind::User, user.account_id, None, "Time out way past 5pm.")
            .await
            .unwrap();
        tracker
            .record(AccountKind::User, user.account_id, None, "Time out way past 5pm.")
            .await
            .unwrap();
        tracker
            .record(AccountKind::User, other.account_id, None, "Time out way past 5pm.")
            .await
            .unwrap();

        assert_eq!(
            tracker
                .unresolved_count(AccountKind::User, user.account_id)
                .await
                .unwrap(),
            2
        );

        tracker
            .review(first, ViolationStatus::Resolved)
            .await
            .unwrap();
        assert_eq!(
            tracker
                .unresolved_count(AccountKind::User, user.account_id)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn review_of_missing_violation_is_not_found() {
        let conn = setup_test_db().await;
        let tracker = ViolationTracker::new(conn);
        let err = tracker
            .review(404, ViolationStatus::Resolved)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }
}
