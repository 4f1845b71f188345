//! Error types for the ATM engine
//!
//! Every failure the engine can report lives in [`AtmError`]. Interactive
//! errors (bad credentials, insufficient funds, unknown recipient, bad menu
//! choice) are recoverable: the session prints them and keeps going. Seed-file
//! and console I/O errors are fatal and end the process.
//!
//! # Error Categories
//!
//! - **Session Errors**: invalid credentials, invalid menu choice, malformed input
//! - **Account Errors**: insufficient funds, invalid amount, self transfer, overflow
//! - **Directory Errors**: account not found, duplicate account
//! - **Startup Errors**: seed file parsing, I/O

use super::transaction::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ATM engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AtmError {
    /// The (id, PIN) pair does not match a registered account
    ///
    /// Deliberately does not say which half was wrong.
    #[error("Invalid User ID or PIN")]
    InvalidCredentials,

    /// Too many failed logins under a bounded login policy
    #[error("Too many failed login attempts ({attempts})")]
    LoginAttemptsExhausted {
        /// Number of attempts made
        attempts: u32,
    },

    /// The requested amount exceeds the account balance
    ///
    /// No state changes on any account when this is returned.
    #[error("Insufficient funds for account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account that would be debited
        account: AccountId,
        /// Balance at the time of the request
        balance: Decimal,
        /// Requested amount
        requested: Decimal,
    },

    /// No account registered under the given id
    #[error("Account {account} not found")]
    AccountNotFound {
        /// Id that failed to resolve
        account: AccountId,
    },

    /// An account with this id is already registered
    #[error("Account {account} is already registered")]
    DuplicateAccount {
        /// Conflicting id
        account: AccountId,
    },

    /// Menu selection outside 1-5 (or not a number)
    #[error("Invalid menu choice '{choice}'")]
    InvalidMenuChoice {
        /// Raw token the user typed
        choice: String,
    },

    /// Amount is zero or negative
    #[error("Invalid amount {amount} for {operation}: amount must be positive")]
    InvalidAmount {
        /// Operation the amount was given to
        operation: String,
        /// Offending amount
        amount: Decimal,
    },

    /// Sender and recipient of a transfer are the same account
    #[error("Cannot transfer from account {account} to itself")]
    SelfTransfer {
        /// The account on both sides
        account: AccountId,
    },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account being credited
        account: AccountId,
    },

    /// Applying the amount would round it away
    ///
    /// The balance holds 28 significant digits; an amount finer than the
    /// balance's remaining precision would be recorded without moving it.
    #[error("Amount {amount} cannot be applied exactly to account {account} in {operation}")]
    PrecisionLoss {
        /// Operation the amount was given to
        operation: String,
        /// Account whose balance would round
        account: AccountId,
        /// Offending amount
        amount: Decimal,
    },

    /// A console token could not be parsed as the expected number
    #[error("Invalid input '{input}': expected {expected}")]
    InvalidInput {
        /// Raw token
        input: String,
        /// Description of what was expected
        expected: String,
    },

    /// The seed file could not be parsed
    #[error("Seed file error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    SeedFile {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// I/O error on the console or the seed file
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },
}

impl From<std::io::Error> for AtmError {
    fn from(error: std::io::Error) -> Self {
        AtmError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for AtmError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        AtmError::SeedFile {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl AtmError {
    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, balance: Decimal, requested: Decimal) -> Self {
        AtmError::InsufficientFunds {
            account,
            balance,
            requested,
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountId) -> Self {
        AtmError::AccountNotFound { account }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account: AccountId) -> Self {
        AtmError::DuplicateAccount { account }
    }

    /// Create an InvalidMenuChoice error
    pub fn invalid_menu_choice(choice: &str) -> Self {
        AtmError::InvalidMenuChoice {
            choice: choice.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(operation: &str, amount: Decimal) -> Self {
        AtmError::InvalidAmount {
            operation: operation.to_string(),
            amount,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        AtmError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// Create a PrecisionLoss error
    pub fn precision_loss(operation: &str, account: AccountId, amount: Decimal) -> Self {
        AtmError::PrecisionLoss {
            operation: operation.to_string(),
            account,
            amount,
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(input: &str, expected: &str) -> Self {
        AtmError::InvalidInput {
            input: input.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Whether the session can report this error and continue
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            AtmError::Io { .. } | AtmError::SeedFile { .. } | AtmError::LoginAttemptsExhausted { .. }
        )
    }
}
