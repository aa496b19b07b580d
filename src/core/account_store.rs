//! Account storage module
//!
//! This module provides the `AccountStore`, a fixed-size array of
//! independently lockable accounts allocated once at startup.
//!
//! The store itself never takes a lock. Callers lock the accounts they need
//! through [`Account::lock`], which lets a ledger hold several account locks at
//! once while executing a multi-account transfer. Account ids are validated
//! here so that an out-of-range id never reaches the array.

use crate::types::{Account, AccountId, InvalidRequest, LedgerError};

/// Fixed set of accounts numbered `1..=len`
#[derive(Debug)]
pub struct AccountStore {
    /// Account `id` lives at index `id - 1`
    accounts: Vec<Account>,
}

impl AccountStore {
    /// Create `count` accounts, all with a zero balance and unlocked
    ///
    /// # Arguments
    ///
    /// * `count` - Number of accounts to allocate
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidConfig` if memory for `count` accounts
    /// cannot be reserved.
    pub fn new(count: AccountId) -> Result<Self, LedgerError> {
        let capacity = usize::try_from(count).unwrap_or(usize::MAX);
        let mut accounts = reserve_accounts(capacity)?;
        accounts.extend((1..=count).map(Account::new));

        Ok(Self { accounts })
    }

    /// Number of accounts in the store
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Look up an account by id
    ///
    /// Returns `None` for ids outside `1..=len`.
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.accounts.get(index)
    }

    /// Look up an account by id, reporting out-of-range ids as an invalid request
    pub fn validate(&self, id: AccountId) -> Result<&Account, InvalidRequest> {
        self.get(id).ok_or(InvalidRequest::AccountOutOfRange {
            account: id,
            account_count: self.len(),
        })
    }

    /// All accounts in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }
}

fn reserve_accounts(count: usize) -> Result<Vec<Account>, LedgerError> {
    let mut accounts = Vec::new();
    accounts.try_reserve_exact(count).map_err(|e| {
        LedgerError::invalid_config(format!("cannot allocate accounts: {count} accounts ({e})"))
    })?;
    Ok(accounts)
}
