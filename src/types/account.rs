//! Account-related types for the ATM engine
//!
//! This module defines the Account structure together with its balance
//! operations. Every operation validates first and mutates last, so a failed
//! call leaves the account (and, for transfers, both accounts) untouched.

use super::error::AtmError;
use super::transaction::{
    AccountId, Pin, Transaction, TransactionId, TransactionIdGenerator, TransactionKind,
};
use log::debug;
use rust_decimal::Decimal;

/// A balance-holding account protected by a PIN
///
/// Fields are private so the non-negative balance invariant can only be
/// changed through the operations below.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    pin: Pin,
    balance: Decimal,
    transactions: Vec<Transaction>,
}

impl Account {
    /// Create a new account with zero balance and an empty history
    pub fn new(id: AccountId, pin: Pin) -> Self {
        Account {
            id,
            pin,
            balance: Decimal::ZERO,
            transactions: Vec::new(),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Check a candidate PIN against the stored one
    ///
    /// Plain equality: there is no lockout or rate limiting here.
    pub fn validate_pin(&self, candidate: Pin) -> bool {
        self.pin == candidate
    }

    /// Transactions in the order they were recorded
    pub fn history(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Credit funds to the account
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is zero or negative
    /// - `ArithmeticOverflow` if the balance cannot hold the result
    /// - `PrecisionLoss` if the sum would round the amount away
    pub fn deposit(
        &mut self,
        amount: Decimal,
        ids: &TransactionIdGenerator,
    ) -> Result<TransactionId, AtmError> {
        ensure_positive("deposit", amount)?;

        self.balance = credit(self.balance, amount, "deposit", self.id)?;
        Ok(self.record(ids.next_id(), TransactionKind::Deposit, amount))
    }

    /// Debit funds from the account
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is zero or negative
    /// - `InsufficientFunds` if `amount` exceeds the balance
    /// - `PrecisionLoss` if the difference would round the amount away
    pub fn withdraw(
        &mut self,
        amount: Decimal,
        ids: &TransactionIdGenerator,
    ) -> Result<TransactionId, AtmError> {
        ensure_positive("withdrawal", amount)?;

        if amount > self.balance {
            return Err(AtmError::insufficient_funds(self.id, self.balance, amount));
        }

        self.balance = debit(self.balance, amount, "withdrawal", self.id)?;
        Ok(self.record(ids.next_id(), TransactionKind::Withdrawal, amount))
    }

    /// Move funds from `sender` to `recipient` as one operation
    ///
    /// Taking both accounts by mutable reference means no caller can observe
    /// one side applied without the other. The sender's TRANSFER_OUT id is
    /// allocated before the recipient's TRANSFER_IN id.
    ///
    /// # Returns
    ///
    /// The `(transfer_out, transfer_in)` transaction ids.
    ///
    /// # Errors
    ///
    /// - `SelfTransfer` if both handles carry the same account id
    /// - `InvalidAmount` if `amount` is zero or negative
    /// - `InsufficientFunds` if `amount` exceeds the sender's balance
    /// - `ArithmeticOverflow` if the recipient's balance cannot hold the result
    /// - `PrecisionLoss` if either side would round the amount away
    pub fn transfer(
        sender: &mut Account,
        recipient: &mut Account,
        amount: Decimal,
        ids: &TransactionIdGenerator,
    ) -> Result<(TransactionId, TransactionId), AtmError> {
        if sender.id == recipient.id {
            return Err(AtmError::SelfTransfer { account: sender.id });
        }
        ensure_positive("transfer", amount)?;

        if amount > sender.balance {
            return Err(AtmError::insufficient_funds(
                sender.id,
                sender.balance,
                amount,
            ));
        }

        let debited = debit(sender.balance, amount, "transfer", sender.id)?;
        let credited = credit(recipient.balance, amount, "transfer", recipient.id)?;

        sender.balance = debited;
        recipient.balance = credited;

        let out_id = sender.record(ids.next_id(), TransactionKind::TransferOut, amount);
        let in_id = recipient.record(ids.next_id(), TransactionKind::TransferIn, amount);

        Ok((out_id, in_id))
    }

    fn record(
        &mut self,
        id: TransactionId,
        kind: TransactionKind,
        amount: Decimal,
    ) -> TransactionId {
        debug!("account {}: {} {} (tx {})", self.id, kind, amount, id);
        self.transactions.push(Transaction::new(id, kind, amount));
        id
    }
}

/// `balance + amount`, exactly
fn credit(
    balance: Decimal,
    amount: Decimal,
    operation: &str,
    account: AccountId,
) -> Result<Decimal, AtmError> {
    let sum = balance
        .checked_add(amount)
        .ok_or_else(|| AtmError::arithmetic_overflow(operation, account))?;
    if sum - balance != amount {
        return Err(AtmError::precision_loss(operation, account, amount));
    }
    Ok(sum)
}

/// `balance - amount`, exactly; the caller has checked `amount <= balance`
fn debit(
    balance: Decimal,
    amount: Decimal,
    operation: &str,
    account: AccountId,
) -> Result<Decimal, AtmError> {
    let rest = balance
        .checked_sub(amount)
        .ok_or_else(|| AtmError::arithmetic_overflow(operation, account))?;
    if balance - rest != amount {
        return Err(AtmError::precision_loss(operation, account, amount));
    }
    Ok(rest)
}

fn ensure_positive(operation: &str, amount: Decimal) -> Result<(), AtmError> {
    if amount <= Decimal::ZERO {
        return Err(AtmError::invalid_amount(operation, amount));
    }
    Ok(())
}
