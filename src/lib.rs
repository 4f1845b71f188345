//! ATM Engine Library
//! # Overview
//!
//! This library models a small ATM: accounts protected by a PIN, deposits,
//! withdrawals, transfers between accounts and a per-account transaction
//! history, driven by an interactive console session.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, AtmError, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Account registries:
//!   - [`core::directory`] - Single-threaded directory used by the console ATM
//!   - [`core::shared_directory`] - Thread-safe directory for concurrent sessions
//! - [`io`] - Console token reader/writer and seed account loading
//! - [`session`] - The login and menu state machine
//!
//! # Transaction Types
//!
//! - **Deposit**: Credit funds to an account
//! - **Withdrawal**: Debit funds from an account (requires sufficient balance)
//! - **Transfer out / Transfer in**: The two sides of one atomic transfer
//!
//! Transaction ids come from one counter per directory, so they are unique and
//! strictly increasing across all accounts.
//!
//! # Account State
//!
//! Each account maintains:
//! - `balance`: never negative; failed operations leave it untouched
//! - `history`: every transaction in the order it was recorded

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod session;
pub mod types;

pub use crate::core::{AccountDirectory, Directory, SharedDirectory};
pub use session::{LoginPolicy, Session, SessionEnd, SessionState};
pub use types::{
    Account, AccountId, AtmError, Pin, Transaction, TransactionId, TransactionKind,
};
