//! Bank Ledger Engine Library
//! # Overview
//!
//! This library provides a concurrent in-memory ledger that executes balance
//! checks and multi-account transfers submitted as text commands. One
//! dispatcher assigns sequence ids and enqueues commands; a pool of worker
//! threads executes them and appends one timestamped result line each.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Command, Outcome, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Per-account locking with ordered acquisition
//!   - [`core::coarse_ledger`] - Single bank-wide lock
//!   - [`core::executor`] - Maps parsed operations onto ledger calls
//! - [`io`] - Command parsing, result logging and balance export
//! - [`server`] - Queue, dispatcher, worker pool and lifecycle
//! - [`strategy`] - Locking strategy selection and server configuration
//!
//! # Commands
//!
//! - **CHECK** `<acct>`: Report one account's balance
//! - **TRANS** `<acct> <amount> [<acct> <amount> ...]`: Apply every amount
//!   atomically, or none if any account would go negative
//!
//! Anything else is answered with `INVALID REQUEST FORMAT`.
//!
//! # Result Lines
//!
//! ```text
//! <id> OK TIME <submitted> <completed>
//! <id> BAL <balance> TIME <submitted> <completed>
//! <id> ISF <acct> TIME <submitted> <completed>
//! <id> INVALID REQUEST FORMAT
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod server;
pub mod strategy;
pub mod types;

pub use core::{CoarseLedger, FineGrainedLedger, Ledger, TransferOutcome};
pub use io::write_balances_csv;
pub use server::{LedgerServer, RunReport, RunSummary};
pub use strategy::{create_ledger, ServerConfig};
pub use types::{
    AccountId, Balance, Command, InvalidRequest, LedgerError, Operation, Outcome, ResultLine,
    SequenceId, TransferLeg,
};
