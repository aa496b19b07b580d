//! Command queue
//!
//! An unbounded FIFO shared by the dispatcher (single producer) and the
//! worker pool (consumers). The internal lock is held only for O(1)
//! structural changes, never while a command executes.
//!
//! Idle workers block on a condition variable instead of polling. Closing the
//! queue is the shutdown signal: after [`CommandQueue::close`] no command is
//! accepted, and [`CommandQueue::dequeue`] keeps handing out what is left
//! until the queue is empty, then returns `None`.

use crate::types::{Command, LedgerError};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

#[derive(Debug, Default)]
struct QueueState {
    commands: VecDeque<Command>,
    closed: bool,
}

/// Thread-safe FIFO of commands awaiting execution
#[derive(Debug, Default)]
pub struct CommandQueue {
    state: Mutex<QueueState>,
    /// Signalled when a command arrives or the queue closes
    available: Condvar,
    /// Signalled when the last queued command is taken
    drained: Condvar,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command at the tail
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::QueueClosed` once [`close`](Self::close) has been
    /// called; the command is dropped.
    pub fn enqueue(&self, command: Command) -> Result<(), LedgerError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(LedgerError::queue_closed(command.sequence_id));
        }
        state.commands.push_back(command);
        drop(state);

        self.available.notify_one();
        Ok(())
    }

    /// Remove the head command without blocking
    ///
    /// Returns `None` if the queue is currently empty.
    pub fn try_dequeue(&self) -> Option<Command> {
        let mut state = self.state.lock();
        self.pop_front(&mut state)
    }

    /// Remove the head command, waiting for one if the queue is empty
    ///
    /// Returns `None` only when the queue is closed and fully drained.
    pub fn dequeue(&self) -> Option<Command> {
        let mut state = self.state.lock();
        loop {
            if let Some(command) = self.pop_front(&mut state) {
                return Some(command);
            }
            if state.closed {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    fn pop_front(&self, state: &mut QueueState) -> Option<Command> {
        let command = state.commands.pop_front()?;
        if state.commands.is_empty() {
            self.drained.notify_all();
        }
        Some(command)
    }

    /// Number of commands waiting
    pub fn size(&self) -> usize {
        self.state.lock().commands.len()
    }

    /// Stop accepting commands and wake every idle consumer
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Block until every queued command has been taken by a consumer
    ///
    /// Taken commands may still be executing when this returns.
    pub fn wait_until_drained(&self) {
        let mut state = self.state.lock();
        while !state.commands.is_empty() {
            self.drained.wait(&mut state);
        }
    }
}
