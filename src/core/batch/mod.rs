//! Bounded-concurrency batch processing
//!
//! One driver serves all four pipelines: it fans records out under a
//! concurrency cap, records exactly one outcome per record, and snapshots
//! accumulated results to disk every K successes and once at the end.

pub mod driver;
pub mod types;

#[cfg(test)]
mod tests;

pub use driver::BatchDriver;
pub use types::{BatchConfig, BatchSummary, FailureRecord, TaskError, TaskOutcome, TaskResult};
