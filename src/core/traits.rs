//! Core trait for ledger operations
//!
//! This module defines the abstraction that lets the worker pool run against
//! either locking strategy interchangeably.

use crate::types::{AccountId, Balance, InvalidRequest, TransferLeg};

/// Result of an admitted transfer request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Every leg was applied
    Committed,

    /// Nothing was applied; the named account (the first in ascending id
    /// order) would have gone negative
    InsufficientFunds(AccountId),
}

/// Trait for executing balance checks and transfers against shared accounts
///
/// Implementations are shared by every worker thread, so all methods take
/// `&self` and must be safe to call concurrently.
pub trait Ledger: Send + Sync {
    /// Number of accounts, numbered `1..=account_count`
    fn account_count(&self) -> usize;

    /// Read one account's balance under its lock
    fn check(&self, account: AccountId) -> Result<Balance, InvalidRequest>;

    /// Apply every leg atomically, or none of them
    fn transfer(&self, legs: &[TransferLeg]) -> Result<TransferOutcome, InvalidRequest>;

    /// Every balance in ascending id order, read so that no transfer is
    /// observed half-applied
    fn snapshot(&self) -> Vec<Balance>;
}
