//! Core trait for account directories
//!
//! This module defines the trait abstraction that allows both the
//! single-threaded and the thread-safe directory to drive the same session.

use crate::types::{AccountId, AtmError, Pin, Transaction, TransactionId};
use rust_decimal::Decimal;

/// Registry of accounts plus the operations a session performs on them
///
/// Implementations own every account and the transaction-id counter. All
/// operations address accounts by id; an unknown id yields `AccountNotFound`.
pub trait Directory {
    /// Register a new zero-balance account, rejecting duplicate ids
    fn register(&mut self, id: AccountId, pin: Pin) -> Result<(), AtmError>;

    /// Whether an account is registered under `id`
    fn contains(&self, id: AccountId) -> bool;

    /// Check an (id, PIN) pair
    ///
    /// Fails with `InvalidCredentials` both for unknown ids and wrong PINs.
    fn authenticate(&self, id: AccountId, pin: Pin) -> Result<(), AtmError>;

    /// Current balance of an account
    fn balance(&self, id: AccountId) -> Result<Decimal, AtmError>;

    /// Snapshot of an account's transactions in recorded order
    fn history(&self, id: AccountId) -> Result<Vec<Transaction>, AtmError>;

    /// Credit funds to an account
    fn deposit(&mut self, id: AccountId, amount: Decimal) -> Result<TransactionId, AtmError>;

    /// Debit funds from an account
    fn withdraw(&mut self, id: AccountId, amount: Decimal) -> Result<TransactionId, AtmError>;

    /// Move funds between two accounts atomically
    ///
    /// Returns the sender's TRANSFER_OUT and the recipient's TRANSFER_IN ids.
    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(TransactionId, TransactionId), AtmError>;
}

impl<T: Directory + ?Sized> Directory for &mut T {
    fn register(&mut self, id: AccountId, pin: Pin) -> Result<(), AtmError> {
        (**self).register(id, pin)
    }

    fn contains(&self, id: AccountId) -> bool {
        (**self).contains(id)
    }

    fn authenticate(&self, id: AccountId, pin: Pin) -> Result<(), AtmError> {
        (**self).authenticate(id, pin)
    }

    fn balance(&self, id: AccountId) -> Result<Decimal, AtmError> {
        (**self).balance(id)
    }

    fn history(&self, id: AccountId) -> Result<Vec<Transaction>, AtmError> {
        (**self).history(id)
    }

    fn deposit(&mut self, id: AccountId, amount: Decimal) -> Result<TransactionId, AtmError> {
        (**self).deposit(id, amount)
    }

    fn withdraw(&mut self, id: AccountId, amount: Decimal) -> Result<TransactionId, AtmError> {
        (**self).withdraw(id, amount)
    }

    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(TransactionId, TransactionId), AtmError> {
        (**self).transfer(from, to, amount)
    }
}
