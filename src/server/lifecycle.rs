//! Server lifecycle
//!
//! `LedgerServer::run` wires the pieces together for one run:
//!
//! ```text
//! input ──▶ Dispatcher ──▶ CommandQueue ──▶ Worker × N ──▶ ResultLogger ──▶ output
//!              │                               │
//!              ▼                               ▼
//!           status                      Ledger (fine | coarse)
//! ```
//!
//! # Lifecycle
//!
//! `Accepting` → `Draining` → `Terminated`. The dispatcher runs on the
//! calling thread while the workers consume. When ingestion stops (sentinel,
//! end of input or an I/O error) the queue is closed and the server waits for
//! it to drain, then joins every worker. Every command accepted before the
//! queue closed is executed exactly once before `Terminated`.
//!
//! # Thread Safety
//!
//! Workers are scoped threads borrowing one `LedgerContext`, so the ledger,
//! the queue and the output stream outlive every thread that uses them.

use crate::core::Ledger;
use crate::io::ResultLogger;
use crate::server::dispatcher::{DispatchSummary, Dispatcher};
use crate::server::queue::CommandQueue;
use crate::server::worker::{Worker, WorkerStats};
use crate::strategy::{create_ledger, ServerConfig};
use crate::types::{Balance, LedgerError};
use parking_lot::Mutex;
use std::io::{self, BufRead, Write};
use std::thread::{self, ScopedJoinHandle};
use tracing::{error, info};

/// Phase of a server run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Dispatcher is reading input, workers are consuming
    Accepting,
    /// Queue is closed; workers are finishing what is left
    Draining,
    /// Queue is empty and every worker has been joined
    Terminated,
}

/// State shared by the dispatcher and every worker during one run
pub struct LedgerContext<W: Write> {
    ledger: Box<dyn Ledger>,
    queue: CommandQueue,
    logger: ResultLogger<W>,
    state: Mutex<LifecycleState>,
}

impl<W: Write> LedgerContext<W> {
    pub fn new(ledger: Box<dyn Ledger>, output: W) -> Self {
        Self {
            ledger,
            queue: CommandQueue::new(),
            logger: ResultLogger::new(output),
            state: Mutex::new(LifecycleState::Accepting),
        }
    }

    pub fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn logger(&self) -> &ResultLogger<W> {
        &self.logger
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    fn transition(&self, next: LifecycleState) {
        let mut state = self.state.lock();
        info!(from = ?*state, to = ?next, "lifecycle transition");
        *state = next;
    }

    /// Close the queue, wait for it to drain and join every worker
    ///
    /// Workers are joined even if one of them panicked; the first panic is
    /// reported after all of them have been joined.
    fn shut_down(
        &self,
        workers: Vec<ScopedJoinHandle<'_, WorkerStats>>,
    ) -> Result<WorkerStats, LedgerError> {
        self.queue.close();
        self.transition(LifecycleState::Draining);

        if !workers.is_empty() {
            self.queue.wait_until_drained();
        }

        let mut totals = WorkerStats::default();
        let mut panicked = None;
        for (index, handle) in workers.into_iter().enumerate() {
            match handle.join() {
                Ok(stats) => totals.merge(&stats),
                Err(_) => {
                    error!(worker = index, "worker thread panicked");
                    panicked.get_or_insert(LedgerError::worker_panicked(index));
                }
            }
        }

        self.transition(LifecycleState::Terminated);

        match panicked {
            Some(err) => Err(err),
            None => Ok(totals),
        }
    }

    /// Shut down the workers started so far after `worker` failed to spawn
    ///
    /// The spawn error is returned either way; a failed shutdown is logged
    /// and appended to its message.
    fn abandon_startup(
        &self,
        workers: Vec<ScopedJoinHandle<'_, WorkerStats>>,
        worker: usize,
        spawn_error: &io::Error,
    ) -> LedgerError {
        let mut message = spawn_error.to_string();
        if let Err(shutdown) = self.shut_down(workers) {
            error!(error = %shutdown, "shutdown after failed spawn also failed");
            message = format!("{message}; shutdown also failed: {shutdown}");
        }
        LedgerError::WorkerSpawn { worker, message }
    }

    /// Flush and hand back the results stream
    pub fn into_output(self) -> Result<W, LedgerError> {
        self.logger.into_inner()
    }
}

/// Counters for one completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands accepted by the dispatcher
    pub accepted: u64,
    /// Whether input ended with the sentinel
    pub saw_sentinel: bool,
    /// Outcome counts across all workers
    pub totals: WorkerStats,
    /// Result lines that reached the output stream
    pub results_written: u64,
}

impl RunSummary {
    pub fn write_failures(&self) -> u64 {
        self.totals.write_failures
    }
}

/// Everything a finished run hands back
#[derive(Debug)]
pub struct RunReport<W> {
    /// The flushed results stream
    pub output: W,
    pub summary: RunSummary,
    /// Balance of account `i + 1` at index `i`, read after every worker exited
    pub final_balances: Vec<Balance>,
}

/// Ledger server: dispatcher, worker pool and lifecycle controller
pub struct LedgerServer {
    config: ServerConfig,
    ledger: Box<dyn Ledger>,
}

impl LedgerServer {
    /// Validate `config` and allocate the ledger's accounts
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidConfig` if the configuration has no
    /// workers or the accounts cannot be allocated.
    pub fn new(config: ServerConfig) -> Result<Self, LedgerError> {
        if config.workers == 0 {
            return Err(LedgerError::invalid_config("worker count must be at least 1"));
        }

        let ledger = create_ledger(config.locking, config.accounts)?;
        Ok(Self { config, ledger })
    }

    /// Run one session to completion
    ///
    /// Spawns the worker pool, reads commands from `input` on the calling
    /// thread (echoing `ID <n>` to `status`), and returns once every accepted
    /// command has been executed and its result line appended to `output`.
    ///
    /// # Arguments
    ///
    /// * `input` - Command lines, terminated by `END` or end of input
    /// * `status` - Receives one `ID <n>` line per accepted command
    /// * `output` - Receives one result line per executed command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A worker thread cannot be spawned
    /// - Reading input or writing the status echo fails
    /// - A worker thread panics
    /// - The results stream cannot be flushed
    ///
    /// In every case the queue is closed, drained and all started workers are
    /// joined before the error is returned.
    pub fn run<R, S, W>(self, input: R, status: S, output: W) -> Result<RunReport<W>, LedgerError>
    where
        R: BufRead,
        S: Write,
        W: Write + Send,
    {
        let Self { config, ledger } = self;
        let context = LedgerContext::new(ledger, output);
        info!(
            workers = config.workers,
            accounts = config.accounts,
            locking = ?config.locking,
            "starting ledger server"
        );

        let (dispatch, totals) = thread::scope(|scope| {
            let mut workers = Vec::with_capacity(config.workers);

            for index in 0..config.workers {
                let worker = Worker::new(index, &context);
                let spawned = thread::Builder::new()
                    .name(format!("ledger-worker-{index}"))
                    .spawn_scoped(scope, move || worker.run());

                match spawned {
                    Ok(handle) => workers.push(handle),
                    Err(e) => {
                        error!(worker = index, error = %e, "failed to spawn worker");
                        return Err(context.abandon_startup(workers, index, &e));
                    }
                }
            }

            let dispatched = Dispatcher::new(context.queue(), status).run(input);
            let joined = context.shut_down(workers);

            Ok::<(DispatchSummary, WorkerStats), LedgerError>((dispatched?, joined?))
        })?;

        let final_balances = context.ledger().snapshot();
        let results_written = context.logger().lines_written();
        let output = context.into_output()?;

        let summary = RunSummary {
            accepted: dispatch.accepted,
            saw_sentinel: dispatch.saw_sentinel,
            totals,
            results_written,
        };
        info!(
            accepted = summary.accepted,
            ok = totals.committed,
            balance = totals.balance_checks,
            insufficient = totals.insufficient,
            invalid = totals.invalid,
            write_failures = totals.write_failures,
            "run complete"
        );

        Ok(RunReport {
            output,
            summary,
            final_balances,
        })
    }
}
