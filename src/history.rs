//! Undo log: an ordered sequence of transactions, each an ordered sequence
//! of inverse operations.
//!
//! The log is generic over the operation type so it knows nothing about
//! folders. It has two states: `Idle`, where every recorded inverse becomes
//! its own single-operation transaction, and `Recording`, where inverses are
//! appended to the open transaction until the outermost
//! [`commit`](ActionLog::commit). Nested [`begin`](ActionLog::begin) calls
//! are flattened into the outer transaction through a depth counter.

use std::collections::VecDeque;

/// Default number of transactions kept before the oldest is dropped.
pub const DEFAULT_UNDO_LIMIT: usize = 128;

/// Whether the log currently has an open transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogState {
    Idle,
    Recording,
}

/// One user-visible undo step.
///
/// Inverses are stored oldest first, in the order the original actions were
/// applied. Replay must walk them newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction<A> {
    inverses: Vec<A>,
}

impl<A> Transaction<A> {
    fn new() -> Self {
        Self {
            inverses: Vec::new(),
        }
    }

    /// Number of inverse operations in this step.
    pub fn len(&self) -> usize {
        self.inverses.len()
    }

    /// `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.inverses.is_empty()
    }

    /// Consume the transaction, yielding inverses newest first.
    pub fn into_replay_order(self) -> impl Iterator<Item = A> {
        self.inverses.into_iter().rev()
    }
}

/// Bounded stack of [`Transaction`]s plus the currently open one.
#[derive(Debug, Clone)]
pub struct ActionLog<A> {
    transactions: VecDeque<Transaction<A>>,
    open: Option<Transaction<A>>,
    depth: usize,
    limit: usize,
}

impl<A> Default for ActionLog<A> {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

impl<A> ActionLog<A> {
    /// Create an empty log that keeps at most `limit` transactions.
    ///
    /// A `limit` of zero is treated as one.
    pub fn new(limit: usize) -> Self {
        Self {
            transactions: VecDeque::new(),
            open: None,
            depth: 0,
            limit: limit.max(1),
        }
    }

    pub fn state(&self) -> LogState {
        if self.depth > 0 {
            LogState::Recording
        } else {
            LogState::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state() == LogState::Recording
    }

    /// Number of committed transactions available to undo.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Open a transaction, or join the one already open.
    pub fn begin(&mut self) {
        if self.depth == 0 {
            self.open = Some(Transaction::new());
        }
        self.depth += 1;
    }

    /// Close one level of transaction.
    ///
    /// Only the outermost commit pushes the coalesced transaction. Returns the
    /// number of inverses committed, or `None` when an inner level closed, the
    /// transaction was empty, or no transaction was open.
    pub fn commit(&mut self) -> Option<usize> {
        if self.depth == 0 {
            return None;
        }
        self.depth -= 1;
        if self.depth > 0 {
            return None;
        }
        let txn = self.open.take()?;
        if txn.is_empty() {
            return None;
        }
        let count = txn.len();
        self.push(txn);
        Some(count)
    }

    /// Append an inverse to the open transaction, or record it as a
    /// single-operation transaction when idle.
    pub fn record_inverse(&mut self, op: A) {
        match self.open.as_mut() {
            Some(txn) if self.depth > 0 => txn.inverses.push(op),
            _ => {
                let mut txn = Transaction::new();
                txn.inverses.push(op);
                self.push(txn);
            }
        }
    }

    /// Remove and return the most recent committed transaction.
    pub fn pop(&mut self) -> Option<Transaction<A>> {
        self.transactions.pop_back()
    }

    /// Drop every committed transaction. An open transaction is kept.
    pub fn clear(&mut self) {
        self.transactions.clear();
    }

    /// Drop every committed transaction and empty the open one.
    ///
    /// Nesting depth is kept, so pending [`commit`](ActionLog::commit) calls
    /// stay balanced; they commit whatever is recorded after the reset.
    pub fn reset(&mut self) {
        self.transactions.clear();
        if let Some(txn) = self.open.as_mut() {
            txn.inverses.clear();
        }
    }

    fn push(&mut self, txn: Transaction<A>) {
        self.transactions.push_back(txn);
        while self.transactions.len() > self.limit {
            self.transactions.pop_front();
        }
    }
}
