//! Fine-grained ledger
//!
//! This module provides the `FineGrainedLedger`, which locks only the accounts
//! a request touches, plus the transfer helpers shared with the coarse ledger.
//!
//! # Lock Ordering
//!
//! A transfer acquires the locks of all its accounts before reading any
//! balance, always in ascending account id order, and releases them in
//! descending order. Because every worker acquires account locks in the same
//! total order, no cycle of workers can each hold a lock the next one waits
//! on, so transfers over overlapping account sets never deadlock.
//!
//! # Atomicity
//!
//! Every involved lock is held across the whole admission-check-then-apply
//! sequence, so other workers observe either no leg applied or all of them.

use crate::core::account_store::AccountStore;
use crate::core::traits::{Ledger, TransferOutcome};
use crate::types::{
    Account, AccountGuard, AccountId, Balance, InvalidRequest, LedgerError, TransferLeg,
};

/// Ledger with one lock per account
#[derive(Debug)]
pub struct FineGrainedLedger {
    store: AccountStore,
}

impl FineGrainedLedger {
    /// Create a ledger of `account_count` zero-balance accounts
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidConfig` if the accounts cannot be allocated.
    pub fn new(account_count: AccountId) -> Result<Self, LedgerError> {
        Ok(Self {
            store: AccountStore::new(account_count)?,
        })
    }
}

impl Ledger for FineGrainedLedger {
    fn account_count(&self) -> usize {
        self.store.len()
    }

    fn check(&self, account: AccountId) -> Result<Balance, InvalidRequest> {
        let account = self.store.validate(account)?;
        let guard = account.lock();
        Ok(guard.read())
    }

    fn transfer(&self, legs: &[TransferLeg]) -> Result<TransferOutcome, InvalidRequest> {
        let ordered = lock_order(&self.store, legs)?;
        let mut guards = acquire_in_order(&ordered);
        let outcome = admit_and_apply(&mut guards, &ordered);
        release_in_reverse(guards);
        outcome
    }

    fn snapshot(&self) -> Vec<Balance> {
        let guards: Vec<AccountGuard<'_>> =
            self.store.iter().map(|account| account.lock()).collect();
        let balances = guards.iter().map(AccountGuard::read).collect();
        release_in_reverse(guards);
        balances
    }
}

/// A transfer leg paired with the account it resolved to
#[derive(Debug, Clone, Copy)]
pub struct OrderedLeg<'a> {
    pub account: &'a Account,
    pub leg: TransferLeg,
}

/// Validate a transfer's legs and sort them into lock-acquisition order
///
/// Each account id is resolved exactly once here. Each leg keeps its own
/// amount, so deltas still land on the accounts named in the request no
/// matter how the input was ordered.
///
/// # Errors
///
/// - `AccountOutOfRange` if any account id is outside the store
/// - `DuplicateAccount` if the same account is named twice
pub fn lock_order<'a>(
    store: &'a AccountStore,
    legs: &[TransferLeg],
) -> Result<Vec<OrderedLeg<'a>>, InvalidRequest> {
    let mut ordered = legs
        .iter()
        .map(|&leg| {
            Ok(OrderedLeg {
                account: store.validate(leg.account)?,
                leg,
            })
        })
        .collect::<Result<Vec<_>, InvalidRequest>>()?;
    ordered.sort_by_key(|entry| entry.leg.account);

    if let Some(pair) = ordered
        .windows(2)
        .find(|pair| pair[0].leg.account == pair[1].leg.account)
    {
        return Err(InvalidRequest::DuplicateAccount {
            account: pair[0].leg.account,
        });
    }

    Ok(ordered)
}

/// Lock every leg's account, in the order given
///
/// `ordered` must come from [`lock_order`], so the order is ascending and
/// `guards[i]` belongs to `ordered[i]`.
pub(crate) fn acquire_in_order<'a>(ordered: &[OrderedLeg<'a>]) -> Vec<AccountGuard<'a>> {
    ordered.iter().map(|entry| entry.account.lock()).collect()
}

/// Run the admission check and, if every leg passes, apply all deltas
///
/// `guards[i]` must be the lock for `ordered[i]`. No balance is written unless
/// every leg is admitted.
pub(crate) fn admit_and_apply(
    guards: &mut [AccountGuard<'_>],
    ordered: &[OrderedLeg<'_>],
) -> Result<TransferOutcome, InvalidRequest> {
    let mut updated = Vec::with_capacity(ordered.len());

    for (guard, OrderedLeg { leg, .. }) in guards.iter().zip(ordered) {
        let balance = guard
            .read()
            .checked_add(leg.amount)
            .ok_or(InvalidRequest::BalanceOverflow {
                account: leg.account,
            })?;

        if balance < 0 {
            return Ok(TransferOutcome::InsufficientFunds(leg.account));
        }
        updated.push(balance);
    }

    for (guard, balance) in guards.iter_mut().zip(updated) {
        guard.write(balance);
    }

    Ok(TransferOutcome::Committed)
}

/// Drop guards last-acquired first
pub(crate) fn release_in_reverse(mut guards: Vec<AccountGuard<'_>>) {
    while let Some(guard) = guards.pop() {
        drop(guard);
    }
}
