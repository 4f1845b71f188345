//! Account directory module
//!
//! This module provides the `AccountDirectory` struct which owns every account
//! for a single-session ATM and the counter that numbers their transactions.
//!
//! The AccountDirectory is responsible for:
//! - Registering accounts and rejecting duplicate ids
//! - Resolving ids to accounts for lookup and authentication
//! - Routing balance operations to the right account(s)
//! - Allocating transaction ids from one process-wide sequence

use crate::core::traits::Directory;
use crate::types::{
    Account, AccountId, AtmError, Pin, Transaction, TransactionId, TransactionIdGenerator,
};
use log::{debug, info};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Single-threaded registry of accounts
///
/// Every mutating operation takes `&mut self`, so a transfer holds exclusive
/// access to both accounts for its whole duration.
pub struct AccountDirectory {
    /// Map of account ids to accounts
    accounts: HashMap<AccountId, Account>,

    /// Shared by all accounts in this directory
    ids: TransactionIdGenerator,
}

impl AccountDirectory {
    /// Create an empty directory whose first transaction id will be 1
    pub fn new() -> Self {
        AccountDirectory {
            accounts: HashMap::new(),
            ids: TransactionIdGenerator::new(),
        }
    }

    /// Look up an account by id
    ///
    /// # Returns
    ///
    /// * `Some(&Account)` - If the account is registered
    /// * `None` - If no account has this id
    pub fn lookup(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory for AccountDirectory {
    fn register(&mut self, id: AccountId, pin: Pin) -> Result<(), AtmError> {
        if self.accounts.contains_key(&id) {
            return Err(AtmError::duplicate_account(id));
        }
        self.accounts.insert(id, Account::new(id, pin));
        info!("registered account {}", id);
        Ok(())
    }

    fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    fn authenticate(&self, id: AccountId, pin: Pin) -> Result<(), AtmError> {
        match self.lookup(id) {
            Some(account) if account.validate_pin(pin) => Ok(()),
            _ => Err(AtmError::InvalidCredentials),
        }
    }

    fn balance(&self, id: AccountId) -> Result<Decimal, AtmError> {
        self.lookup(id)
            .map(Account::balance)
            .ok_or_else(|| AtmError::account_not_found(id))
    }

    fn history(&self, id: AccountId) -> Result<Vec<Transaction>, AtmError> {
        self.lookup(id)
            .map(|account| account.history().to_vec())
            .ok_or_else(|| AtmError::account_not_found(id))
    }

    fn deposit(&mut self, id: AccountId, amount: Decimal) -> Result<TransactionId, AtmError> {
        let ids = &self.ids;
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AtmError::account_not_found(id))?;
        account.deposit(amount, ids)
    }

    fn withdraw(&mut self, id: AccountId, amount: Decimal) -> Result<TransactionId, AtmError> {
        let ids = &self.ids;
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AtmError::account_not_found(id))?;
        account.withdraw(amount, ids)
    }

    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(TransactionId, TransactionId), AtmError> {
        if !self.accounts.contains_key(&from) {
            return Err(AtmError::account_not_found(from));
        }
        if !self.accounts.contains_key(&to) {
            return Err(AtmError::account_not_found(to));
        }
        if from == to {
            return Err(AtmError::SelfTransfer { account: from });
        }

        // Take the sender out so both accounts can be borrowed mutably; it is
        // put back before returning whatever the outcome.
        let mut sender = self
            .accounts
            .remove(&from)
            .ok_or_else(|| AtmError::account_not_found(from))?;
        let result = match self.accounts.get_mut(&to) {
            Some(recipient) => Account::transfer(&mut sender, recipient, amount, &self.ids),
            None => Err(AtmError::account_not_found(to)),
        };
        self.accounts.insert(from, sender);

        if let Ok((out_id, in_id)) = result {
            debug!(
                "transfer {} -> {} of {} (tx {} / {})",
                from, to, amount, out_id, in_id
            );
        }
        result
    }
}
