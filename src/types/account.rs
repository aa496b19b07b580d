//! Account-related types for the bank ledger engine
//!
//! This module defines the `Account` record and the guard through which its
//! balance is read and written.
//!
//! An account's balance can only be reached through an [`AccountGuard`], which
//! is obtained by locking the account. The type system therefore enforces the
//! ledger invariant that a balance is never read or written without its lock
//! being held.

use parking_lot::{Mutex, MutexGuard};

/// Account identifier
///
/// Accounts are numbered from 1 to the configured account count.
pub type AccountId = u32;

/// Signed account balance
///
/// Also used for transfer amounts: a positive amount credits an account, a
/// negative amount debits it.
pub type Balance = i64;

/// A single ledger account
///
/// Allocated once at startup with a zero balance and never destroyed until the
/// ledger is dropped. Each account carries its own exclusive lock so that
/// transfers touching disjoint accounts never contend.
#[derive(Debug)]
pub struct Account {
    /// The account id (1-based)
    id: AccountId,

    /// Current balance, guarded by this account's lock
    balance: Mutex<Balance>,
}

impl Account {
    /// Create a new account with a zero balance
    ///
    /// # Arguments
    ///
    /// * `id` - The account id for this account
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            balance: Mutex::new(0),
        }
    }

    /// The id of this account
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Acquire this account's lock
    ///
    /// Blocks until no other worker holds the lock. The lock is released when
    /// the returned guard is dropped.
    pub fn lock(&self) -> AccountGuard<'_> {
        AccountGuard {
            id: self.id,
            balance: self.balance.lock(),
        }
    }
}

/// Exclusive access to one account's balance
///
/// Holding an `AccountGuard` is the only way to read or write a balance.
#[derive(Debug)]
pub struct AccountGuard<'a> {
    id: AccountId,
    balance: MutexGuard<'a, Balance>,
}

impl AccountGuard<'_> {
    /// The id of the locked account
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Read the current balance
    pub fn read(&self) -> Balance {
        *self.balance
    }

    /// Overwrite the balance
    pub fn write(&mut self, balance: Balance) {
        *self.balance = balance;
    }
}
