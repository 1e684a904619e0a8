//! Error taxonomy for the attendance and ledger core.
//!
//! Domain errors (`NotFound`, `InvalidAmount`, `InsufficientBalance`,
//! `TooManyViolations`, `MissingPrerequisite`) are generated close to the
//! violated rule and returned to the caller unmodified. Storage errors are
//! wrapped as [`Error::Persistence`] and rendered generically so storage
//! internals never leak into user-facing messages.

use rust_decimal::Decimal;
use sea_orm::DbErr;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All failure modes the core can surface to a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// No account, token, session, or violation matched the given key.
    ///
    /// User-facing and non-retryable: retrying the same input cannot succeed.
    #[error("no matching account or record was found")]
    NotFound,

    /// A top-up or debit was requested with a non-positive amount.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// A debit would have driven the balance below zero.
    ///
    /// The balance is never observably negative between two successful
    /// operations; the failed debit leaves it untouched.
    #[error("insufficient balance: {available} available, {requested} requested")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    /// Check-in refused because the account carries too many unresolved
    /// violations.
    ///
    /// This is a policy refusal, not a system fault — callers should display
    /// the message rather than treat it as an error condition.
    #[error("check-in refused: {0} unresolved violations on record")]
    TooManyViolations(u64),

    /// An activation precondition (registered vehicle, driver's license) is
    /// not satisfied.
    #[error("prerequisite not met: {0}")]
    MissingPrerequisite(&'static str),

    /// Transient storage failure. The whole operation is safe to resubmit:
    /// every mutating sequence runs in a single transaction, so a failure
    /// here means a confirmed rollback.
    #[error("storage failure")]
    Persistence(#[from] DbErr),
}

impl Error {
    /// Whether resubmitting the same operation can succeed.
    ///
    /// Only [`Error::Persistence`] is retryable; the domain errors describe
    /// inputs or policy state that a retry would hit again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Persistence(_))
    }
}
