//! Locking strategy module
//!
//! This module selects how the ledger serializes access to account balances.
//! Both strategies produce identical observable results; they differ only in
//! how much work can proceed in parallel.
//!
//! - **fine**: one lock per account, transfers lock their accounts in
//!   ascending id order (default)
//! - **coarse**: one bank-wide lock around every check and transfer

use crate::cli::LockingStrategy;
use crate::core::{CoarseLedger, FineGrainedLedger, Ledger};
use crate::types::{AccountId, LedgerError};
use tracing::warn;

/// Startup configuration for a ledger server
///
/// Controls the size of the worker pool, the number of accounts and the
/// locking strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Number of worker threads
    pub workers: usize,
    /// Number of accounts, numbered `1..=accounts`
    pub accounts: AccountId,
    /// How balance access is serialized
    pub locking: LockingStrategy,
}

impl ServerConfig {
    /// Create a validated configuration
    ///
    /// A worker count of zero falls back to the number of logical CPUs.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidConfig` if `accounts` is zero.
    pub fn new(
        workers: usize,
        accounts: AccountId,
        locking: LockingStrategy,
    ) -> Result<Self, LedgerError> {
        if accounts == 0 {
            return Err(LedgerError::invalid_config(
                "cannot allocate accounts: account count must be at least 1",
            ));
        }

        let workers = if workers == 0 {
            let fallback = num_cpus::get();
            warn!(
                "Invalid worker count ({}), using default ({})",
                workers, fallback
            );
            fallback
        } else {
            workers
        };

        Ok(Self {
            workers,
            accounts,
            locking,
        })
    }
}

/// Create a ledger using the specified locking strategy
///
/// # Arguments
///
/// * `strategy` - How balance access is serialized
/// * `accounts` - Number of accounts, each starting at balance 0
///
/// # Returns
///
/// A boxed trait object implementing the `Ledger` trait
///
/// # Errors
///
/// Returns `LedgerError::InvalidConfig` if the accounts cannot be allocated.
pub fn create_ledger(
    strategy: LockingStrategy,
    accounts: AccountId,
) -> Result<Box<dyn Ledger>, LedgerError> {
    Ok(match strategy {
        LockingStrategy::Fine => Box::new(FineGrainedLedger::new(accounts)?),
        LockingStrategy::Coarse => Box::new(CoarseLedger::new(accounts)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransferLeg;
    use rstest::rstest;

    #[rstest]
    #[case::explicit_workers(4, 4)]
    #[case::zero_workers_fall_back(0, num_cpus::get())]
    fn test_server_config_workers(#[case] workers: usize, #[case] expected: usize) {
        let config = ServerConfig::new(workers, 10, LockingStrategy::Fine).unwrap();

        assert_eq!(config.workers, expected);
        assert_eq!(config.accounts, 10);
    }

    #[test]
    fn test_server_config_rejects_zero_accounts() {
        let result = ServerConfig::new(2, 0, LockingStrategy::Coarse);

        assert!(matches!(result, Err(LedgerError::InvalidConfig { .. })));
    }

    #[rstest]
    fn test_create_ledger(
        #[values(LockingStrategy::Fine, LockingStrategy::Coarse)] strategy: LockingStrategy,
    ) {
        let ledger = create_ledger(strategy, 3).unwrap();

        ledger.transfer(&[TransferLeg::new(2, 40)]).unwrap();

        assert_eq!(ledger.account_count(), 3);
        assert_eq!(ledger.check(2), Ok(40));
        assert_eq!(ledger.snapshot(), vec![0, 40, 0]);
    }
}
