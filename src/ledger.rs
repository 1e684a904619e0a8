//! The funds ledger attached to an account's RFID token.
//!
//! Top-up comes in two intentionally distinct flavors: activation *sets* the
//! opening balance ([`BalanceLedger::set_initial_balance`], called inside the
//! activation transaction) while standalone replenishment *increments* it
//! ([`BalanceLedger::top_up`]). Overloading one operation with both meanings
//! is exactly the ambiguity this split removes.

use chrono::Local;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QuerySelect, Select, Set, TransactionTrait,
};
use tracing::info;

use crate::account::AccountKind;
use crate::entity::{rfid_token, top_up};
use crate::error::{Error, Result};

/// Outcome of a successful replenishment: the new balance and the id of the
/// history row written in the same transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TopUpReceipt {
    pub balance: Decimal,
    pub history_id: i32,
}

/// Balance operations over the token bound to an account.
///
/// Every mutating sequence here is a read-then-write and runs inside a single
/// transaction with the token row locked, so a top-up racing a debit cannot
/// lose an update and the balance is never observably negative between two
/// successful operations.
#[derive(Debug, Clone)]
pub struct BalanceLedger {
    conn: DatabaseConnection,
}

impl BalanceLedger {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Current balance on the account's token.
    ///
    /// Fails with [`Error::NotFound`] when the account holds no token.
    pub async fn balance(&self, kind: AccountKind, account_id: i32) -> Result<Decimal> {
        let token = token_query(kind, account_id)
            .one(&self.conn)
            .await?
            .ok_or(Error::NotFound)?;
        Ok(token.load_balance)
    }

    /// Increments the balance of an already-active account and appends a
    /// top-up history row, both in one transaction.
    ///
    /// Fails with [`Error::InvalidAmount`] when `amount <= 0` and with
    /// [`Error::NotFound`] when the account holds no token; in either case
    /// balance and history are untouched.
    pub async fn top_up(
        &self,
        kind: AccountKind,
        account_id: i32,
        operator_id: i32,
        amount: Decimal,
    ) -> Result<TopUpReceipt> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }

        let txn = self.conn.begin().await?;

        let token = token_query(kind, account_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(Error::NotFound)?;

        let balance = token.load_balance + amount;
        let mut active = token.into_active_model();
        active.load_balance = Set(balance);
        active.update(&txn).await?;

        let history = top_up::ActiveModel {
            kind: Set(kind),
            account_id: Set(account_id),
            operator_id: Set(operator_id),
            load_amount: Set(amount),
            created_at: Set(Local::now().fixed_offset()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            ?kind,
            account_id,
            operator_id,
            %amount,
            %balance,
            "balance topped up"
        );

        Ok(TopUpReceipt {
            balance,
            history_id: history.id,
        })
    }

    /// Debits the balance for point-of-sale consumption.
    ///
    /// Fails with [`Error::InsufficientBalance`] when the result would go
    /// negative; the balance is left untouched.
    pub async fn debit(
        &self,
        kind: AccountKind,
        account_id: i32,
        amount: Decimal,
    ) -> Result<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }

        let txn = self.conn.begin().await?;

        let token = token_query(kind, account_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(Error::NotFound)?;

        if token.load_balance < amount {
            return Err(Error::InsufficientBalance {
                available: token.load_balance,
                requested: amount,
            });
        }

        let balance = token.load_balance - amount;
        let mut active = token.into_active_model();
        active.load_balance = Set(balance);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(?kind, account_id, %amount, %balance, "balance debited");
        Ok(balance)
    }

    /// Sets (not increments) the token balance during account activation.
    ///
    /// Runs on the caller's transaction so the balance write commits or rolls
    /// back together with the status change and history row.
    pub(crate) async fn set_initial_balance<C: ConnectionTrait>(
        conn: &C,
        kind: AccountKind,
        account_id: i32,
        amount: Decimal,
    ) -> Result<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }

        let token = token_query(kind, account_id)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or(Error::NotFound)?;

        let mut active = token.into_active_model();
        active.load_balance = Set(amount);
        active.update(conn).await?;
        Ok(amount)
    }
}

/// The owner foreign-key column for a kind — explicit routing, never built
/// from strings.
pub(crate) fn owner_column(kind: AccountKind) -> rfid_token::Column {
    match kind {
        AccountKind::User => rfid_token::Column::UserId,
        AccountKind::Premium => rfid_token::Column::PremiumId,
        AccountKind::Visitor => rfid_token::Column::VisitorId,
    }
}

/// Select for the token directly bound to an account.
pub(crate) fn token_query(kind: AccountKind, account_id: i32) -> Select<rfid_token::Entity> {
    rfid_token::Entity::find().filter(owner_column(kind).eq(account_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_user, setup_test_db};
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn top_up_increments_and_writes_history() {
        let conn = setup_test_db().await;
        let user = seed_user(&conn, "Ana", "Reyes", "GP-1", Decimal::new(100, 0)).await;
        let ledger = BalanceLedger::new(conn.clone());

        let receipt = ledger
            .top_up(AccountKind::User, user.account_id, 7, Decimal::new(50, 0))
            .await
            .unwrap();
        assert_eq!(receipt.balance, Decimal::new(150, 0));

        let history = top_up::Entity::find_by_id(receipt.history_id)
            .one(&conn)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(history.account_id, user.account_id);
        assert_eq!(history.operator_id, 7);
        assert_eq!(history.load_amount, Decimal::new(50, 0));

        let balance = ledger
            .balance(AccountKind::User, user.account_id)
            .await
            .unwrap();
        assert_eq!(balance, Decimal::new(150, 0));
    }

    #[tokio::test]
    async fn non_positive_top_up_is_rejected_without_side_effects() {
        let conn = setup_test_db().await;
        let user = seed_user(&conn, "Ana", "Reyes", "GP-1", Decimal::new(100, 0)).await;
        let ledger = BalanceLedger::new(conn.clone());

        for amount in [Decimal::ZERO, Decimal::new(-5, 0)] {
            let err = ledger
                .top_up(AccountKind::User, user.account_id, 7, amount)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidAmount));
        }

        let balance = ledger
            .balance(AccountKind::User, user.account_id)
            .await
            .unwrap();
        assert_eq!(balance, Decimal::new(100, 0));

        let history_rows = top_up::Entity::find().count(&conn).await.unwrap();
        assert_eq!(history_rows, 0);
    }

    #[tokio::test]
    async fn debit_refuses_to_go_negative() {
        let conn = setup_test_db().await;
        let user = seed_user(&conn, "Ana", "Reyes", "GP-1", Decimal::new(30, 0)).await;
        let ledger = BalanceLedger::new(conn.clone());

        let err = ledger
            .debit(AccountKind::User, user.account_id, Decimal::new(31, 0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientBalance { available, requested }
                if available == Decimal::new(30, 0) && requested == Decimal::new(31, 0)
        ));

        let balance = ledger
            .balance(AccountKind::User, user.account_id)
            .await
            .unwrap();
        assert_eq!(balance, Decimal::new(30, 0));

        let balance = ledger
            .debit(AccountKind::User, user.account_id, Decimal::new(30, 0))
            .await
            .unwrap();
        assert_eq!(balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn top_up_for_account_without_token_is_not_found() {
        let conn = setup_test_db().await;
        let ledger = BalanceLedger::new(conn);
        let err = ledger
            .top_up(AccountKind::Premium, 999, 7, Decimal::new(10, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }
}
