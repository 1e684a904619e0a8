//! Sea-ORM entity models for the attendance and ledger core.
//!
//! Three account tables (`users`, `premiums`, `visitors`) share one token
//! namespace through `rfid_tokens`, whose owner foreign keys are nullable
//! with exactly one non-null per row. Sessions, their audit log, violations,
//! and top-up history are single tables tagged with the account kind rather
//! than one clone per kind.

pub mod license;
pub mod parking_session;
pub mod premium;
pub mod rfid_token;
pub mod session_log;
pub mod top_up;
pub mod user;
pub mod vehicle;
pub mod violation;
pub mod visitor;
