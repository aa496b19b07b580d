use crate::strategy::ServerConfig;
use crate::types::{AccountId, LedgerError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Run a concurrent bank ledger over commands read from stdin
#[derive(Parser, Debug)]
#[command(name = "ledger-server")]
#[command(about = "Run a concurrent bank ledger over commands read from stdin", long_about = None)]
pub struct CliArgs {
    /// Number of worker threads executing commands
    #[arg(value_name = "WORKERS", help = "Number of worker threads (0: one per CPU core)")]
    pub workers: usize,

    /// Number of accounts, numbered from 1
    #[arg(value_name = "ACCOUNTS", help = "Number of accounts, each starting at balance 0")]
    pub accounts: AccountId,

    /// File receiving one result line per executed command
    #[arg(value_name = "OUT_FILE", help = "Path to the results file (truncated on start)")]
    pub out_file: PathBuf,

    /// How account balances are locked
    #[arg(
        long = "locking",
        value_name = "STRATEGY",
        default_value = "fine",
        help = "Locking strategy: 'fine' for per-account locks or 'coarse' for one bank-wide lock"
    )]
    pub locking: LockingStrategy,

    /// Optional CSV dump of final balances
    #[arg(
        long = "balances-out",
        value_name = "PATH",
        help = "Write final balances as account,balance CSV rows"
    )]
    pub balances_out: Option<PathBuf>,
}

/// Available locking strategies for account access
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LockingStrategy {
    #[default]
    Fine,
    Coarse,
}

impl CliArgs {
    /// Create a ServerConfig from CLI arguments
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidConfig` if the account count is zero.
    pub fn to_server_config(&self) -> Result<ServerConfig, LedgerError> {
        ServerConfig::new(self.workers, self.accounts, self.locking)
    }
}
