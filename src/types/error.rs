//! Error types for the bank ledger engine
//!
//! This module defines the errors that stop a run or prevent it from starting.
//! Malformed commands are not errors at this level: they are reported per
//! command as `INVALID REQUEST FORMAT` through the results stream (see
//! [`InvalidRequest`](super::command::InvalidRequest)).
//!
//! # Error Categories
//!
//! - **Configuration Errors**: Zero accounts, unusable worker settings
//! - **I/O Errors**: Output destination cannot be opened or written, input cannot be read
//! - **Lifecycle Errors**: Commands offered after shutdown began, worker threads lost

use super::command::SequenceId;
use thiserror::Error;

/// Main error type for the ledger engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Startup configuration rejected
    ///
    /// Fatal: raised before any worker runs.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the rejected setting
        message: String,
    },

    /// I/O error on the input, status or output stream
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV error while exporting balances
    #[error("CSV error: {message}")]
    Csv {
        /// Description of the CSV error
        message: String,
    },

    /// A command was offered after the queue stopped accepting work
    #[error("Command {sequence_id} rejected: the queue is draining")]
    QueueClosed {
        /// Sequence id of the refused command
        sequence_id: SequenceId,
    },

    /// A worker thread could not be started
    #[error("Failed to spawn worker {worker}: {message}")]
    WorkerSpawn {
        /// Index of the worker
        worker: usize,
        /// Description of the spawn failure
        message: String,
    },

    /// A worker thread panicked before finishing its loop
    #[error("Worker {worker} panicked")]
    WorkerPanicked {
        /// Index of the worker
        worker: usize,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        LedgerError::Csv {
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        LedgerError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a QueueClosed error
    pub fn queue_closed(sequence_id: SequenceId) -> Self {
        LedgerError::QueueClosed { sequence_id }
    }

    /// Create a WorkerSpawn error
    pub fn worker_spawn(worker: usize, error: &std::io::Error) -> Self {
        LedgerError::WorkerSpawn {
            worker,
            message: error.to_string(),
        }
    }

    /// Create a WorkerPanicked error
    pub fn worker_panicked(worker: usize) -> Self {
        LedgerError::WorkerPanicked { worker }
    }
}
