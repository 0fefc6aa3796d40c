//! Batch driver types

use crate::core::records::RecordKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Record-level failure inside a task: the failing sub-operation's name plus
/// the underlying message. Never aborts the batch.
#[derive(Error, Debug)]
#[error("{operation}: {message}")]
pub struct TaskError {
    pub operation: &'static str,
    pub message: String,
}

impl TaskError {
    pub fn new(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            operation,
            message: err.to_string(),
        }
    }
}

/// What a task function returns to the driver.
pub type TaskResult<T> = std::result::Result<T, TaskError>;

/// Exactly one of these exists per input record once the batch completes.
#[derive(Debug)]
pub enum TaskOutcome<T> {
    Success { key: RecordKey, payload: T },
    Failure { key: RecordKey, error: String },
}

/// One entry of the failure sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailureRecord {
    pub ev_id: String,
    #[serde(rename = "Aircraft_Key", default, skip_serializing_if = "Option::is_none")]
    pub aircraft_key: Option<String>,
    pub error: String,
}

impl FailureRecord {
    pub fn new(key: RecordKey, error: String) -> Self {
        Self {
            ev_id: key.ev_id,
            aircraft_key: key.aircraft_key,
            error,
        }
    }
}

/// Configuration for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum records in flight at once
    pub concurrency: usize,
    /// Snapshot both sinks after every this many successes; `None` disables
    /// periodic snapshots (the final write still happens)
    pub checkpoint_every: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 20,
            checkpoint_every: Some(10),
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// `0` disables periodic checkpoints.
    pub fn with_checkpoint_every(mut self, every: usize) -> Self {
        self.checkpoint_every = if every == 0 { None } else { Some(every) };
        self
    }
}

/// Outcome counts of one completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}
