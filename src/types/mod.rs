//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: the Account and its balance operations
//! - `transaction`: identifiers, transaction kinds and records, id allocation
//! - `error`: Error types for the ATM engine

pub mod account;
pub mod error;
pub mod transaction;

pub use account::Account;
pub use error::AtmError;
pub use transaction::{
    AccountId, Pin, Transaction, TransactionId, TransactionIdGenerator, TransactionKind,
};
