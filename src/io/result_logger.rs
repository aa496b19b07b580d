//! Result line logging
//!
//! The `ResultLogger` serializes result lines from every worker into one
//! output stream. Each line is rendered before the stream lock is taken and
//! written with a single `write_all` while it is held, so lines from
//! concurrent workers never interleave. Lines appear in completion order, not
//! sequence-id order.

use crate::types::{LedgerError, ResultLine};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared, line-atomic writer for the results stream
#[derive(Debug)]
pub struct ResultLogger<W: Write> {
    output: Mutex<W>,
    lines_written: AtomicU64,
}

impl<W: Write> ResultLogger<W> {
    pub fn new(output: W) -> Self {
        Self {
            output: Mutex::new(output),
            lines_written: AtomicU64::new(0),
        }
    }

    /// Append one result line
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Io` if the underlying stream rejects the write.
    /// The line is then lost but the stream stays usable for later lines.
    pub fn append(&self, line: &ResultLine) -> Result<(), LedgerError> {
        let rendered = format!("{line}\n");

        self.output.lock().write_all(rendered.as_bytes())?;
        self.lines_written.fetch_add(1, Ordering::Relaxed);

        Ok(())
    }

    /// Number of lines successfully written so far
    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::Relaxed)
    }

    /// Flush and hand back the output stream
    pub fn into_inner(self) -> Result<W, LedgerError> {
        let mut output = self.output.into_inner();
        output.flush()?;
        Ok(output)
    }
}
