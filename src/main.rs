//! Bank Ledger Server CLI
//!
//! Reads commands from stdin, one per line, until a line reading `END` (or
//! end of input), and executes them on a pool of worker threads.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- 4 1000 results.txt < commands.txt
//! cargo run -- 4 1000 results.txt --locking coarse < commands.txt
//! cargo run -- 4 1000 results.txt --balances-out balances.csv < commands.txt
//! ```
//!
//! Each accepted command is acknowledged on stdout as `ID <n>`. Result lines
//! go to the results file. Logs go to stderr; set `RUST_LOG` to adjust them.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid arguments, unwritable output file, lost result lines, etc.)

use anyhow::{bail, Context, Result};
use bank_ledger_engine::cli::{self, CliArgs};
use bank_ledger_engine::{write_balances_csv, LedgerServer};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = cli::parse_args();

    run(&args)
}

fn run(args: &CliArgs) -> Result<()> {
    let config = args
        .to_server_config()
        .context("Invalid server configuration")?;

    // Allocate the accounts before touching the results file
    let server = LedgerServer::new(config).context("Failed to start ledger server")?;

    let output = File::create(&args.out_file)
        .map(BufWriter::new)
        .with_context(|| format!("Failed to open output file {}", args.out_file.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let report = server
        .run(stdin.lock(), stdout.lock(), output)
        .context("Ledger server failed")?;

    if let Some(path) = &args.balances_out {
        let mut file = BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create balances file {}", path.display()))?,
        );
        write_balances_csv(&report.final_balances, &mut file)
            .context("Failed to write balances")?;
        file.flush().context("Failed to flush balances file")?;
        info!("Final balances written to {}", path.display());
    }

    let write_failures = report.summary.write_failures();
    if write_failures > 0 {
        bail!("{write_failures} result lines could not be written");
    }

    info!(
        "Executed {} commands, results in {}",
        report.summary.totals.executed,
        args.out_file.display()
    );

    Ok(())
}
