//! Promotion of accounts from pending to active status.
//!
//! Activation is the only path to `Active` status and the only caller of the
//! set-semantics balance write. Its contract with the external
//! vehicle-management collaborator is "status is Active iff vehicle-count ≥ 1
//! and the token is funded"; [`ActivationWorkflow::deactivate_if_unvehicled`]
//! is the compensating half of that contract.

use chrono::Local;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::account::{AccountKind, AccountStatus};
use crate::entity::{license, premium, top_up, user, vehicle, visitor};
use crate::error::{Error, Result};
use crate::ledger::{token_query, BalanceLedger};

/// Result of a successful activation.
#[derive(Debug, Clone, PartialEq)]
pub struct Activated {
    /// The opening balance now on the token.
    pub balance: Decimal,
    /// Id of the top-up history row written with the activation.
    pub history_id: i32,
}

/// Activates accounts once their funding and prerequisite records exist.
#[derive(Debug, Clone)]
pub struct ActivationWorkflow {
    conn: DatabaseConnection,
}

impl ActivationWorkflow {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Activates the account, checking preconditions in order: the opening
    /// balance is positive, the account holds an RFID token, and — for kinds
    /// that require them — a registered vehicle and a driver's license exist.
    ///
    /// On success the status change, the set-semantics balance write, and the
    /// top-up history row commit as one transaction.
    pub async fn activate(
        &self,
        kind: AccountKind,
        account_id: i32,
        initial_balance: Decimal,
        operator_id: i32,
    ) -> Result<Activated> {
        if initial_balance <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }

        let txn = self.conn.begin().await?;

        // Token existence is the second precondition; locking it here also
        // serializes the activation against concurrent balance mutations.
        token_query(kind, account_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(Error::NotFound)?;

        let spec = kind.spec();
        if spec.requires_vehicle && vehicle_count(&txn, kind, account_id).await? == 0 {
            return Err(Error::MissingPrerequisite("a registered vehicle"));
        }
        if spec.requires_license && !has_license(&txn, kind, account_id).await? {
            return Err(Error::MissingPrerequisite("a driver's license on file"));
        }

        set_status(&txn, kind, account_id, AccountStatus::Active).await?;
        let balance =
            BalanceLedger::set_initial_balance(&txn, kind, account_id, initial_balance).await?;

        let history = top_up::ActiveModel {
            kind: Set(kind),
            account_id: Set(account_id),
            operator_id: Set(operator_id),
            load_amount: Set(initial_balance),
            created_at: Set(Local::now().fixed_offset()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(?kind, account_id, operator_id, %balance, "account activated");

        Ok(Activated {
            balance,
            history_id: history.id,
        })
    }

    /// Drives the status back to `Inactive` when the account's last vehicle
    /// is gone. Invoked by the external vehicle-management collaborator after
    /// a deletion; returns whether the status changed.
    pub async fn deactivate_if_unvehicled(
        &self,
        kind: AccountKind,
        account_id: i32,
    ) -> Result<bool> {
        if !kind.spec().requires_vehicle {
            return Ok(false);
        }

        let txn = self.conn.begin().await?;
        if vehicle_count(&txn, kind, account_id).await? > 0 {
            return Ok(false);
        }

        set_status(&txn, kind, account_id, AccountStatus::Inactive).await?;
        txn.commit().await?;

        info!(?kind, account_id, "account deactivated: no registered vehicle");
        Ok(true)
    }
}

async fn vehicle_count<C: ConnectionTrait>(
    conn: &C,
    kind: AccountKind,
    account_id: i32,
) -> Result<u64> {
    let column = match kind {
        AccountKind::User => vehicle::Column::UserId,
        AccountKind::Premium => vehicle::Column::PremiumId,
        // Visitors carry vehicle fields inline; they never reach this path.
        AccountKind::Visitor => return Ok(0),
    };
    Ok(vehicle::Entity::find()
        .filter(column.eq(account_id))
        .count(conn)
        .await?)
}

async fn has_license<C: ConnectionTrait>(
    conn: &C,
    kind: AccountKind,
    account_id: i32,
) -> Result<bool> {
    let column = match kind {
        AccountKind::User => license::Column::UserId,
        AccountKind::Premium => license::Column::PremiumId,
        AccountKind::Visitor => return Ok(false),
    };
    Ok(license::Entity::find()
        .filter(column.eq(account_id))
        .count(conn)
        .await?
        > 0)
}

async fn set_status<C: ConnectionTrait>(
    conn: &C,
    kind: AccountKind,
    account_id: i32,
    status: AccountStatus,
) -> Result<()> {
    match kind {
        AccountKind::User => {
            let row = user::Entity::find_by_id(account_id)
                .one(conn)
                .await?
                .ok_or(Error::NotFound)?;
            let mut active = row.into_active_model();
            active.status = Set(status);
            active.update(conn).await?;
        }
        AccountKind::Premium => {
            let row = premium::Entity::find_by_id(account_id)
                .one(conn)
                .await?
                .ok_or(Error::NotFound)?;
            let mut active = row.into_active_model();
            active.status = Set(status);
            active.update(conn).await?;
        }
        AccountKind::Visitor => {
            let row = visitor::Entity::find_by_id(account_id)
                .one(conn)
                .await?
                .ok_or(Error::NotFound)?;
            let mut active = row.into_active_model();
            active.status = Set(status);
            active.update(conn).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        add_license, add_vehicle, seed_user, seed_visitor, setup_test_db,
    };

    async fn user_status(conn: &DatabaseConnection, id: i32) -> AccountStatus {
        user::Entity::find_by_id(id)
            .one(conn)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn activation_requires_a_vehicle_even_when_funded() {
        let conn = setup_test_db().await;
        let user = seed_user(&conn, "Ana", "Reyes", "GP-1", Decimal::new(40, 0)).await;
        let workflow = ActivationWorkflow::new(conn.clone());

        let err = workflow
            .activate(AccountKind::User, user.account_id, Decimal::new(100, 0), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingPrerequisite(_)));

        // Nothing moved: status, balance, and history are untouched.
        assert_eq!(
            user_status(&conn, user.account_id).await,
            AccountStatus::Inactive
        );
        let ledger = BalanceLedger::new(conn.clone());
        assert_eq!(
            ledger
                .balance(AccountKind::User, user.account_id)
                .await
                .unwrap(),
            Decimal::new(40, 0)
        );
        assert_eq!(top_up::Entity::find().count(&conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn activation_sets_rather_than_increments_the_balance() {
        let conn = setup_test_db().await;
        let user = seed_user(&conn, "Ana", "Reyes", "GP-1", Decimal::new(40, 0)).await;
        add_vehicle(&conn, AccountKind::User, user.account_id, "ABC-123").await;
        add_license(&conn, AccountKind::User, user.account_id, "N01-23-456789").await;
        let workflow = ActivationWorkflow::new(conn.clone());

        let activated = workflow
            .activate(AccountKind::User, user.account_id, Decimal::new(100, 0), 7)
            .await
            .unwrap();
        assert_eq!(activated.balance, Decimal::new(100, 0));

        assert_eq!(
            user_status(&conn, user.account_id).await,
            AccountStatus::Active
        );

        let history = top_up::Entity::find_by_id(activated.history_id)
            .one(&conn)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(history.load_amount, Decimal::new(100, 0));
        assert_eq!(history.operator_id, 7);
    }

    #[tokio::test]
    async fn non_positive_opening_balance_is_rejected_first() {
        let conn = setup_test_db().await;
        let user = seed_user(&conn, "Ana", "Reyes", "GP-1", Decimal::ZERO).await;
        let workflow = ActivationWorkflow::new(conn);

        let err = workflow
            .activate(AccountKind::User, user.account_id, Decimal::ZERO, 7)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAmount));
    }

    #[tokio::test]
    async fn visitors_activate_without_vehicle_or_license() {
        let conn = setup_test_db().await;
        let visitor = seed_visitor(&conn, "Cora", "Diaz", "GP-V1").await;
        let workflow = ActivationWorkflow::new(conn.clone());

        let activated = workflow
            .activate(AccountKind::Visitor, visitor.account_id, Decimal::new(20, 0), 7)
            .await
            .unwrap();
        assert_eq!(activated.balance, Decimal::new(20, 0));

        let status = visitor::Entity::find_by_id(visitor.account_id)
            .one(&conn)
            .await
            .unwrap()
            .unwrap()
            .status;
        assert_eq!(status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn losing_the_last_vehicle_deactivates_the_account() {
        let conn = setup_test_db().await;
        let user = seed_user(&conn, "Ana", "Reyes", "GP-1", Decimal::new(10, 0)).await;
        add_vehicle(&conn, AccountKind::User, user.account_id, "ABC-123").await;
        add_license(&conn, AccountKind::User, user.account_id, "N01-23-456789").await;
        let workflow = ActivationWorkflow::new(conn.clone());

        workflow
            .activate(AccountKind::User, user.account_id, Decimal::new(50, 0), 7)
            .await
            .unwrap();

        // Vehicle still present: no change.
        assert!(!workflow
            .deactivate_if_unvehicled(AccountKind::User, user.account_id)
            .await
            .unwrap());

        vehicle::Entity::delete_many()
            .filter(vehicle::Column::UserId.eq(user.account_id))
            .exec(&conn)
            .await
            .unwrap();

        assert!(workflow
            .deactivate_if_unvehicled(AccountKind::User, user.account_id)
            .await
            .unwrap());
        assert_eq!(
            user_status(&conn, user.account_id).await,
            AccountStatus::Inactive
        );
    }
}
