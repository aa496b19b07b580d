//! Server module
//!
//! Runs commands from a line-oriented input through a pool of worker threads.
//!
//! # Components
//!
//! - `queue` - FIFO of accepted commands shared by producer and consumers
//! - `dispatcher` - Reads lines, assigns sequence ids and enqueues them
//! - `worker` - Parses, executes and logs one command at a time
//! - `lifecycle` - Starts the pool, drains the queue and joins the workers

pub mod dispatcher;
pub mod lifecycle;
pub mod queue;
pub mod worker;

pub use dispatcher::{DispatchSummary, Dispatcher, SENTINEL};
pub use lifecycle::{LedgerContext, LedgerServer, LifecycleState, RunReport, RunSummary};
pub use queue::CommandQueue;
pub use worker::{Worker, WorkerStats};
