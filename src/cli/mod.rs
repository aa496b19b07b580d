// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{CliArgs, LockingStrategy};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid or missing arguments, or `--help`), clap prints
/// an error or help text and exits the process.
///
/// # Returns
///
/// Returns a `CliArgs` struct with the parsed command-line arguments.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
