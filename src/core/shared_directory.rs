//! Thread-safe account directory for multi-session use
//!
//! This module provides the `SharedDirectory` struct, which lets several
//! sessions operate on the same set of accounts concurrently.
//!
//! # Design
//!
//! The registry is a `DashMap` from account id to an `Arc<Mutex<Account>>`.
//! The map lock is only held long enough to clone the account handle out, so
//! operations on different accounts never contend on the map itself.
//!
//! # Lock Ordering
//!
//! A transfer locks both accounts for the whole debit+credit pair. The two
//! locks are always taken in ascending account-id order, whichever account is
//! the sender. Any code that needs more than one account lock at a time must
//! follow the same order, otherwise two opposite transfers could deadlock.
//!
//! Transaction ids come from an atomic counter and are allocated while the
//! affected account locks are held, so each account's history stays in
//! increasing id order.

use crate::core::traits::Directory;
use crate::types::{
    Account, AccountId, AtmError, Pin, Transaction, TransactionId, TransactionIdGenerator,
};
use dashmap::DashMap;
use log::{debug, info};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;

type AccountHandle = Arc<Mutex<Account>>;

/// Thread-safe registry of accounts
///
/// All methods take `&self`; share it between threads with an `Arc`.
#[derive(Debug, Default)]
pub struct SharedDirectory {
    accounts: DashMap<AccountId, AccountHandle>,
    ids: TransactionIdGenerator,
}

impl SharedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new zero-balance account
    ///
    /// The existence check and the insert happen under the same shard lock,
    /// so two threads racing on one id cannot both succeed.
    pub fn register(&self, id: AccountId, pin: Pin) -> Result<(), AtmError> {
        let mut inserted = false;
        self.accounts.entry(id).or_insert_with(|| {
            inserted = true;
            Arc::new(Mutex::new(Account::new(id, pin)))
        });

        if !inserted {
            return Err(AtmError::duplicate_account(id));
        }
        info!("registered account {}", id);
        Ok(())
    }

    /// Snapshot of an account by id
    pub fn lookup(&self, id: AccountId) -> Option<Account> {
        self.handle(id).ok().map(|account| account.lock().clone())
    }

    pub fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn authenticate(&self, id: AccountId, pin: Pin) -> Result<(), AtmError> {
        match self.handle(id) {
            Ok(account) if account.lock().validate_pin(pin) => Ok(()),
            _ => Err(AtmError::InvalidCredentials),
        }
    }

    pub fn balance(&self, id: AccountId) -> Result<Decimal, AtmError> {
        Ok(self.handle(id)?.lock().balance())
    }

    pub fn history(&self, id: AccountId) -> Result<Vec<Transaction>, AtmError> {
        Ok(self.handle(id)?.lock().history().to_vec())
    }

    pub fn deposit(&self, id: AccountId, amount: Decimal) -> Result<TransactionId, AtmError> {
        let account = self.handle(id)?;
        let mut account = account.lock();
        account.deposit(amount, &self.ids)
    }

    pub fn withdraw(&self, id: AccountId, amount: Decimal) -> Result<TransactionId, AtmError> {
        let account = self.handle(id)?;
        let mut account = account.lock();
        account.withdraw(amount, &self.ids)
    }

    /// Move funds between two accounts, holding both locks throughout
    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(TransactionId, TransactionId), AtmError> {
        let sender = self.handle(from)?;
        let recipient = self.handle(to)?;
        if from == to {
            return Err(AtmError::SelfTransfer { account: from });
        }

        let (mut sender, mut recipient) = if from < to {
            let sender = sender.lock();
            let recipient = recipient.lock();
            (sender, recipient)
        } else {
            let recipient = recipient.lock();
            let sender = sender.lock();
            (sender, recipient)
        };

        let result = Account::transfer(&mut sender, &mut recipient, amount, &self.ids);
        if let Ok((out_id, in_id)) = result {
            debug!(
                "transfer {} -> {} of {} (tx {} / {})",
                from, to, amount, out_id, in_id
            );
        }
        result
    }

    fn handle(&self, id: AccountId) -> Result<AccountHandle, AtmError> {
        self.accounts
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| AtmError::account_not_found(id))
    }
}

/// Each session holds a shared reference, so many sessions can run at once
impl Directory for &SharedDirectory {
    fn register(&mut self, id: AccountId, pin: Pin) -> Result<(), AtmError> {
        SharedDirectory::register(*self, id, pin)
    }

    fn contains(&self, id: AccountId) -> bool {
        SharedDirectory::contains(*self, id)
    }

    fn authenticate(&self, id: AccountId, pin: Pin) -> Result<(), AtmError> {
        SharedDirectory::authenticate(*self, id, pin)
    }

    fn balance(&self, id: AccountId) -> Result<Decimal, AtmError> {
        SharedDirectory::balance(*self, id)
    }

    fn history(&self, id: AccountId) -> Result<Vec<Transaction>, AtmError> {
        SharedDirectory::history(*self, id)
    }

    fn deposit(&mut self, id: AccountId, amount: Decimal) -> Result<TransactionId, AtmError> {
        SharedDirectory::deposit(*self, id, amount)
    }

    fn withdraw(&mut self, id: AccountId, amount: Decimal) -> Result<TransactionId, AtmError> {
        SharedDirectory::withdraw(*self, id, amount)
    }

    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(TransactionId, TransactionId), AtmError> {
        SharedDirectory::transfer(*self, from, to, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use std::thread;

    fn seeded() -> SharedDirectory {
        let directory = SharedDirectory::new();
        directory.register(1, 1111).unwrap();
        directory.register(2, 2222).unwrap();
        directory
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let directory = seeded();
        assert_eq!(
            directory.register(1, 9999),
            Err(AtmError::duplicate_account(1))
        );
        assert_eq!(directory.len(), 2);
        assert!(directory.authenticate(1, 1111).is_ok());
    }

    #[test]
    fn test_authenticate_rejects_wrong_pin_and_unknown_id() {
        let directory = seeded();
        assert_eq!(directory.authenticate(1, 2222), Err(AtmError::InvalidCredentials));
        assert_eq!(directory.authenticate(3, 1111), Err(AtmError::InvalidCredentials));
    }

    #[test]
    fn test_transfer_in_descending_id_order() {
        let directory = seeded();
        directory.deposit(2, Decimal::from(30)).unwrap();

        let ids = directory.transfer(2, 1, Decimal::from(20)).unwrap();

        assert_eq!(ids, (2, 3));
        assert_eq!(directory.balance(1), Ok(Decimal::from(20)));
        assert_eq!(directory.balance(2), Ok(Decimal::from(10)));
        assert_eq!(
            directory.history(1).unwrap(),
            vec![Transaction::new(3, TransactionKind::TransferIn, Decimal::from(20))]
        );
    }

    #[test]
    fn test_transfer_to_self_does_not_deadlock() {
        let directory = seeded();
        directory.deposit(1, Decimal::TEN).unwrap();

        assert_eq!(
            directory.transfer(1, 1, Decimal::ONE),
            Err(AtmError::SelfTransfer { account: 1 })
        );
        assert_eq!(directory.balance(1), Ok(Decimal::TEN));
    }

    #[test]
    fn test_transfer_to_unknown_recipient() {
        let directory = seeded();
        directory.deposit(1, Decimal::TEN).unwrap();

        assert_eq!(
            directory.transfer(1, 99, Decimal::ONE),
            Err(AtmError::account_not_found(99))
        );
        assert_eq!(directory.balance(1), Ok(Decimal::TEN));
    }

    #[test]
    fn test_lookup_returns_snapshot() {
        let directory = seeded();
        let before = directory.lookup(1).unwrap();

        directory.deposit(1, Decimal::ONE).unwrap();

        assert_eq!(before.balance(), Decimal::ZERO);
        assert_eq!(directory.lookup(1).map(|a| a.balance()), Some(Decimal::ONE));
        assert!(directory.lookup(3).is_none());
    }

    #[test]
    fn test_opposite_concurrent_transfers_conserve_total() {
        let directory = Arc::new(seeded());
        directory.deposit(1, Decimal::from(1000)).unwrap();
        directory.deposit(2, Decimal::from(1000)).unwrap();

        let workers: Vec<_> = [(1, 2), (2, 1), (1, 2), (2, 1)]
            .into_iter()
            .map(|(from, to)| {
                let directory = Arc::clone(&directory);
                thread::spawn(move || {
                    for _ in 0..500 {
                        // Either side may run dry; failures are fine here
                        let _ = directory.transfer(from, to, Decimal::ONE);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let total = directory.balance(1).unwrap() + directory.balance(2).unwrap();
        assert_eq!(total, Decimal::from(2000));
        assert!(directory.balance(1).unwrap() >= Decimal::ZERO);
        assert!(directory.balance(2).unwrap() >= Decimal::ZERO);
    }

    #[test]
    fn test_concurrent_ids_are_unique_and_increasing_per_account() {
        let directory = Arc::new(seeded());

        let workers: Vec<_> = [1, 2, 1, 2]
            .into_iter()
            .map(|id| {
                let directory = Arc::clone(&directory);
                thread::spawn(move || {
                    for _ in 0..250 {
                        directory.deposit(id, Decimal::ONE).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let mut all: Vec<TransactionId> = Vec::new();
        for id in [1, 2] {
            let history = directory.history(id).unwrap();
            assert!(history.windows(2).all(|pair| pair[0].id < pair[1].id));
            all.extend(history.iter().map(|tx| tx.id));
        }
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 1000);
    }
}
