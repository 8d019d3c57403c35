//! Batch Reports
//!
//! Outcome of one handler call: how many records arrived, how many rows were
//! written, and why the others were not.

use crate::recording::error::RecordError;

/// One record of a batch that did not produce a row.
#[derive(Debug)]
pub struct RecordFailure {
    /// Position of the record within its batch.
    pub index: usize,
    /// Order id or market id, when the event carried one.
    pub key: Option<String>,
    pub error: RecordError,
}

/// Result of processing one batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub received: usize,
    pub written: usize,
    pub failures: Vec<RecordFailure>,
}

impl BatchReport {
    pub fn new(received: usize) -> Self {
        Self {
            received,
            ..Self::default()
        }
    }

    /// True when every received record was mapped without error.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Folds another report into this one. Failure indices keep their batch-local meaning.
    pub fn absorb(&mut self, other: BatchReport) {
        self.received += other.received;
        self.written += other.written;
        self.failures.extend(other.failures);
    }
}
