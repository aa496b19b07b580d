//! Types module
//!
//! Contains core data structures used throughout the engine.
//! This module organizes types into logical submodules:
//! - `account`: Account records and the guard that grants balance access
//! - `command`: Commands, parsed operations and invalid-request reasons
//! - `outcome`: Execution outcomes, timestamps and result lines
//! - `error`: Error types for the ledger engine

pub mod account;
pub mod command;
pub mod error;
pub mod outcome;

pub use account::{Account, AccountGuard, AccountId, Balance};
pub use command::{Command, InvalidRequest, Operation, SequenceId, TransferLeg};
pub use error::LedgerError;
pub use outcome::{Outcome, ResultLine, Timestamp};
