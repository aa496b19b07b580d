//! Ingestion loop
//!
//! The `Dispatcher` reads one command per line, stamps it with the next
//! sequence id and the current time, and enqueues it. Text is not tokenized
//! here; workers do that. Each accepted id is echoed as `ID <n>` to a status
//! stream that is separate from the results stream.
//!
//! A line equal to [`SENTINEL`] ends ingestion and closes the queue. The
//! sentinel itself is never enqueued and consumes no sequence id. End of input
//! without a sentinel is treated the same way.

use crate::server::queue::CommandQueue;
use crate::types::{Command, LedgerError, SequenceId};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Line that ends ingestion
pub const SENTINEL: &str = "END";

/// What the dispatcher did during one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Number of commands enqueued; their ids are exactly `1..=accepted`
    pub accepted: u64,

    /// Whether ingestion stopped at the sentinel rather than end of input
    pub saw_sentinel: bool,
}

/// Producer side of the command queue
#[derive(Debug)]
pub struct Dispatcher<'a, S: Write> {
    queue: &'a CommandQueue,
    status: S,
    next_id: SequenceId,
}

impl<'a, S: Write> Dispatcher<'a, S> {
    /// Create a dispatcher whose first command gets id 1
    pub fn new(queue: &'a CommandQueue, status: S) -> Self {
        Self {
            queue,
            status,
            next_id: 1,
        }
    }

    /// Read `input` until the sentinel or end of input, then close the queue
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
    /// garbled line becomes an invalid request instead of a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input or writing the status echo
    /// fails. The queue is left open in that case; the caller is responsible
    /// for closing it.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<DispatchSummary, LedgerError> {
        let mut accepted = 0;
        let mut buffer = Vec::new();

        let saw_sentinel = loop {
            buffer.clear();
            if input.read_until(b'\n', &mut buffer)? == 0 {
                break false;
            }

            let line = String::from_utf8_lossy(strip_line_ending(&buffer));
            if line == SENTINEL {
                break true;
            }

            let sequence_id = self.next_id;
            self.queue.enqueue(Command::new(sequence_id, line))?;
            writeln!(self.status, "ID {sequence_id}")?;
            debug!(sequence_id, "command accepted");

            self.next_id += 1;
            accepted += 1;
        };

        if saw_sentinel {
            info!(accepted, "end marker received, stopping ingestion");
        } else {
            warn!(accepted, "input ended without {SENTINEL}, stopping ingestion");
        }

        self.queue.close();
        self.status.flush()?;

        Ok(DispatchSummary {
            accepted,
            saw_sentinel,
        })
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
