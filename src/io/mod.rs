//! I/O module
//!
//! Handles command text parsing and output.
//!
//! # Components
//!
//! - `parser` - Tokenizes and classifies one command line
//! - `result_logger` - Line-atomic writer for the results stream
//! - `balances_csv` - CSV export of final balances

pub mod balances_csv;
pub mod parser;
pub mod result_logger;

pub use balances_csv::{write_balances_csv, BalanceRow};
pub use parser::{CommandParser, MAX_TOKEN_LEN};
pub use result_logger::ResultLogger;
