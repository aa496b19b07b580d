//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - The `Ledger` abstraction shared by both locking strategies
//! - `account_store` - Fixed array of individually lockable accounts
//! - `ledger` - Per-account locking with ordered acquisition
//! - `coarse_ledger` - Single bank-wide lock
//! - `executor` - Maps parsed operations onto ledger calls

pub mod account_store;
pub mod coarse_ledger;
pub mod executor;
pub mod ledger;
pub mod traits;

pub use account_store::AccountStore;
pub use coarse_ledger::CoarseLedger;
pub use executor::execute;
pub use ledger::FineGrainedLedger;
pub use traits::{Ledger, TransferOutcome};
