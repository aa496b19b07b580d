//! Worker loop
//!
//! Each worker repeatedly takes the next command off the shared queue,
//! parses it with its own private [`CommandParser`], executes it against the
//! ledger, stamps the completion time and appends the result line. A worker
//! exits only when the queue is closed and empty, so every enqueued command
//! is executed exactly once by exactly one worker.

use crate::core::execute;
use crate::io::CommandParser;
use crate::server::lifecycle::LedgerContext;
use crate::types::{Command, Outcome, ResultLine, Timestamp};
use std::io::Write;
use tracing::{debug, error, warn};

/// Per-worker execution counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Commands taken off the queue and executed
    pub executed: u64,
    /// Transfers applied (`OK`)
    pub committed: u64,
    /// Balance checks answered (`BAL`)
    pub balance_checks: u64,
    /// Transfers rejected for insufficient funds (`ISF`)
    pub insufficient: u64,
    /// Requests answered with `INVALID REQUEST FORMAT`
    pub invalid: u64,
    /// Result lines the output stream refused
    pub write_failures: u64,
}

impl WorkerStats {
    fn record(&mut self, outcome: &Outcome) {
        self.executed += 1;
        match outcome {
            Outcome::Committed => self.committed += 1,
            Outcome::Balance(_) => self.balance_checks += 1,
            Outcome::InsufficientFunds(_) => self.insufficient += 1,
            Outcome::Invalid(_) => self.invalid += 1,
        }
    }

    /// Add another worker's counters to these
    pub fn merge(&mut self, other: &WorkerStats) {
        self.executed += other.executed;
        self.committed += other.committed;
        self.balance_checks += other.balance_checks;
        self.insufficient += other.insufficient;
        self.invalid += other.invalid;
        self.write_failures += other.write_failures;
    }
}

/// One consumer of the command queue
pub struct Worker<'a, W: Write> {
    index: usize,
    context: &'a LedgerContext<W>,
    parser: CommandParser,
    stats: WorkerStats,
}

impl<'a, W: Write> Worker<'a, W> {
    pub fn new(index: usize, context: &'a LedgerContext<W>) -> Self {
        Self {
            index,
            context,
            parser: CommandParser::new(),
            stats: WorkerStats::default(),
        }
    }

    /// Consume commands until the queue is closed and drained
    pub fn run(mut self) -> WorkerStats {
        debug!(worker = self.index, "worker started");

        while let Some(command) = self.context.queue().dequeue() {
            self.handle(command);
        }

        debug!(
            worker = self.index,
            executed = self.stats.executed,
            "worker finished"
        );
        self.stats
    }

    /// Parse, execute and log one command
    pub fn handle(&mut self, command: Command) {
        let operation = self.parser.parse(&command.raw_text);
        let outcome = execute(self.context.ledger(), &operation);
        let completed_at = Timestamp::now();

        match &outcome {
            Outcome::Invalid(reason) => warn!(
                worker = self.index,
                sequence_id = command.sequence_id,
                %reason,
                "invalid request"
            ),
            outcome => debug!(
                worker = self.index,
                sequence_id = command.sequence_id,
                outcome = outcome.tag(),
                "command executed"
            ),
        }

        let line = ResultLine {
            sequence_id: command.sequence_id,
            outcome,
            submitted_at: command.submitted_at,
            completed_at,
        };
        self.stats.record(&line.outcome);

        if let Err(e) = self.context.logger().append(&line) {
            error!(
                worker = self.index,
                sequence_id = line.sequence_id,
                error = %e,
                "failed to write result line"
            );
            self.stats.write_failures += 1;
        }
    }
}
