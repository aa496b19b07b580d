//! Command-related types for the bank ledger engine
//!
//! This module defines the commands taken from input, the operations they
//! parse into, and the reasons a request can be rejected as malformed.

use super::account::{AccountId, Balance};
use super::outcome::Timestamp;
use thiserror::Error;

/// Command sequence identifier
///
/// Assigned by the dispatcher starting at 1, incremented once per accepted
/// input line, without gaps.
pub type SequenceId = u64;

/// A request accepted from input, waiting to be executed
///
/// Created by the dispatcher and immutable once enqueued. Tokenization is
/// deferred to the worker that dequeues it, so only the raw text is carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Position of this command in the input stream
    pub sequence_id: SequenceId,

    /// The input line, without its line terminator
    pub raw_text: String,

    /// When the dispatcher accepted the line
    pub submitted_at: Timestamp,
}

impl Command {
    /// Create a command stamped with the current time
    pub fn new(sequence_id: SequenceId, raw_text: impl Into<String>) -> Self {
        Self {
            sequence_id,
            raw_text: raw_text.into(),
            submitted_at: Timestamp::now(),
        }
    }
}

/// One `(account, amount)` pair of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLeg {
    /// The account the amount applies to
    pub account: AccountId,

    /// Signed delta: positive credits, negative debits
    pub amount: Balance,
}

impl TransferLeg {
    pub fn new(account: AccountId, amount: Balance) -> Self {
        Self { account, amount }
    }
}

/// A parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Read one account's balance
    Check { account: AccountId },

    /// Apply every leg atomically, or none of them
    ///
    /// Legs are kept in input order; the ledger sorts them for locking.
    Transfer { legs: Vec<TransferLeg> },

    /// The request could not be understood
    Invalid(InvalidRequest),
}

/// Why a request was reported as `INVALID REQUEST FORMAT`
///
/// These are per-command outcomes, never fatal: the command is answered
/// with an invalid result line and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRequest {
    #[error("empty request")]
    Empty,

    #[error("unknown command '{keyword}'")]
    UnknownCommand { keyword: String },

    #[error("{keyword} does not accept {tokens} tokens")]
    WrongArity {
        keyword: &'static str,
        tokens: usize,
    },

    #[error("'{token}' is not a valid {field}")]
    MalformedNumber { token: String, field: &'static str },

    #[error("account {account} is outside 1..={account_count}")]
    AccountOutOfRange {
        account: AccountId,
        account_count: usize,
    },

    #[error("account {account} appears more than once in one transfer")]
    DuplicateAccount { account: AccountId },

    #[error("balance of account {account} would overflow")]
    BalanceOverflow { account: AccountId },
}
