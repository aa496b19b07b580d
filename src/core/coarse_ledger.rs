//! Coarse-grained ledger
//!
//! Serializes every check, transfer and snapshot behind a single bank-wide
//! lock. Account locks are still taken (they are the only way to reach a
//! balance) but are never contended, since the bank lock is always acquired
//! first. Observable results match [`FineGrainedLedger`](super::ledger::FineGrainedLedger);
//! only throughput differs.

use crate::core::account_store::AccountStore;
use crate::core::ledger::{acquire_in_order, admit_and_apply, lock_order, release_in_reverse};
use crate::core::traits::{Ledger, TransferOutcome};
use crate::types::{AccountId, Balance, InvalidRequest, LedgerError, TransferLeg};
use parking_lot::Mutex;

/// Ledger guarded by one bank-wide lock
#[derive(Debug)]
pub struct CoarseLedger {
    bank: Mutex<()>,
    store: AccountStore,
}

impl CoarseLedger {
    pub fn new(account_count: AccountId) -> Result<Self, LedgerError> {
        Ok(Self {
            bank: Mutex::new(()),
            store: AccountStore::new(account_count)?,
        })
    }
}

impl Ledger for CoarseLedger {
    fn account_count(&self) -> usize {
        self.store.len()
    }

    fn check(&self, account: AccountId) -> Result<Balance, InvalidRequest> {
        let account = self.store.validate(account)?;
        let _bank = self.bank.lock();
        let balance = account.lock().read();
        Ok(balance)
    }

    fn transfer(&self, legs: &[TransferLeg]) -> Result<TransferOutcome, InvalidRequest> {
        let ordered = lock_order(&self.store, legs)?;
        let _bank = self.bank.lock();
        let mut guards = acquire_in_order(&ordered);
        let outcome = admit_and_apply(&mut guards, &ordered);
        release_in_reverse(guards);
        outcome
    }

    fn snapshot(&self) -> Vec<Balance> {
        let _bank = self.bank.lock();
        self.store.iter().map(|account| account.lock().read()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coarse_transfer_and_check() {
        let ledger = CoarseLedger::new(3).unwrap();

        assert_eq!(
            ledger.transfer(&[TransferLeg::new(1, 100)]),
            Ok(TransferOutcome::Committed)
        );
        assert_eq!(
            ledger.transfer(&[TransferLeg::new(2, 50), TransferLeg::new(1, -50)]),
            Ok(TransferOutcome::Committed)
        );
        assert_eq!(ledger.check(1), Ok(50));
        assert_eq!(ledger.snapshot(), vec![50, 50, 0]);
    }

    #[test]
    fn test_coarse_insufficient_funds_changes_nothing() {
        let ledger = CoarseLedger::new(3).unwrap();

        assert_eq!(
            ledger.transfer(&[TransferLeg::new(1, 100), TransferLeg::new(2, -50)]),
            Ok(TransferOutcome::InsufficientFunds(2))
        );
        assert_eq!(ledger.snapshot(), vec![0, 0, 0]);
    }

    #[test]
    fn test_coarse_rejects_duplicates_and_out_of_range() {
        let ledger = CoarseLedger::new(2).unwrap();

        assert_eq!(
            ledger.transfer(&[TransferLeg::new(1, 1), TransferLeg::new(1, 1)]),
            Err(InvalidRequest::DuplicateAccount { account: 1 })
        );
        assert!(ledger.check(3).is_err());
    }

    #[test]
    fn test_bank_lock_released_after_each_call() {
        let ledger = CoarseLedger::new(1).unwrap();
        ledger.transfer(&[TransferLeg::new(1, 1)]).unwrap();
        ledger.check(1).unwrap();

        assert!(ledger.bank.try_lock().is_some());
    }
}
