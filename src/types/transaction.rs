//! Transaction-related types for the ATM engine
//!
//! This module defines the identifiers shared across the crate, the kinds of
//! ledger events an account can record, and the immutable `Transaction` record.

use rust_decimal::Decimal;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Account identifier (the "User ID" typed at the ATM)
pub type AccountId = u32;

/// Personal identification number used for login
pub type Pin = u32;

/// Transaction identifier
///
/// Allocated from a single counter per directory, so identifiers are unique
/// and strictly increasing across all accounts combined.
pub type TransactionId = u64;

/// Kinds of balance-affecting events recorded in an account's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Funds credited by the account holder
    Deposit,

    /// Funds debited by the account holder
    Withdrawal,

    /// Sender side of a transfer
    TransferOut,

    /// Recipient side of a transfer
    TransferIn,
}

impl TransactionKind {
    /// Upper-case label used in the transaction history listing
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
            TransactionKind::TransferOut => "TRANSFER_OUT",
            TransactionKind::TransferIn => "TRANSFER_IN",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ledger event
///
/// Created at the moment a balance changes and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Process-wide unique identifier
    pub id: TransactionId,

    /// What happened to the balance
    pub kind: TransactionKind,

    /// Amount moved (always positive)
    pub amount: Decimal,
}

impl Transaction {
    pub fn new(id: TransactionId, kind: TransactionKind, amount: Decimal) -> Self {
        Transaction { id, kind, amount }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction ID: {}, Type: {}, Amount: ${}",
            self.id, self.kind, self.amount
        )
    }
}

/// Source of transaction identifiers
///
/// Starts at 1 and hands out each value exactly once. Backed by an atomic so a
/// single generator can be shared by concurrent sessions.
#[derive(Debug)]
pub struct TransactionIdGenerator {
    next: AtomicU64,
}

impl TransactionIdGenerator {
    pub fn new() -> Self {
        TransactionIdGenerator {
            next: AtomicU64::new(1),
        }
    }

    /// Allocate the next identifier
    pub fn next_id(&self) -> TransactionId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for TransactionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
