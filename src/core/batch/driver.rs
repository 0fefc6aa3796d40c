//! The batch driver

use super::types::{BatchConfig, BatchSummary, FailureRecord, TaskOutcome, TaskResult};
use crate::core::records::Keyed;
use crate::error::Result;
use crate::storage::CheckpointSink;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use serde::Serialize;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{info, warn};

fn describe_panic(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("task panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("task panicked: {s}")
    } else {
        "task panicked".to_string()
    }
}

/// Drives one batch run: bounded fan-out, one outcome per record, periodic
/// and final checkpoints. The driver is the sole mutator of the result and
/// failure sequences, so every snapshot is a consistent view.
#[derive(Debug)]
pub struct BatchDriver {
    config: BatchConfig,
    sink: CheckpointSink,
}

impl BatchDriver {
    pub fn new(config: BatchConfig, sink: CheckpointSink) -> Self {
        Self { config, sink }
    }

    /// Run `task` over every record. Outcomes accumulate in completion order,
    /// which is not input order. A task returning an error, or panicking,
    /// yields a failure entry for that record and the batch continues; only
    /// checkpoint-write failures abort the run.
    pub async fn run<R, T, F, Fut>(
        &self,
        records: Vec<R>,
        task: F,
    ) -> Result<(Vec<T>, Vec<FailureRecord>, BatchSummary)>
    where
        R: Keyed,
        T: Serialize,
        F: Fn(R) -> Fut,
        Fut: Future<Output = TaskResult<T>>,
    {
        let total = records.len();
        info!(total, concurrency = self.config.concurrency, "batch started");

        let task = &task;
        let mut outcomes = stream::iter(records.into_iter().map(|record| {
            let key = record.key();
            async move {
                match AssertUnwindSafe(task(record)).catch_unwind().await {
                    Ok(Ok(payload)) => TaskOutcome::Success { key, payload },
                    Ok(Err(err)) => TaskOutcome::Failure {
                        key,
                        error: err.to_string(),
                    },
                    Err(panic) => TaskOutcome::Failure {
                        key,
                        error: describe_panic(panic),
                    },
                }
            }
        }))
        .buffer_unordered(self.config.concurrency.max(1));

        let mut results: Vec<T> = Vec::new();
        let mut failures: Vec<FailureRecord> = Vec::new();

        while let Some(outcome) = outcomes.next().await {
            match outcome {
                TaskOutcome::Success { key, payload } => {
                    info!(%key, "record completed");
                    results.push(payload);
                    if let Some(every) = self.config.checkpoint_every {
                        if results.len() % every == 0 {
                            self.sink.write(&results, &failures).await?;
                            info!(
                                successes = results.len(),
                                "periodic checkpoint written"
                            );
                        }
                    }
                }
                TaskOutcome::Failure { key, error } => {
                    warn!(%key, %error, "record failed");
                    failures.push(FailureRecord::new(key, error));
                }
            }
        }

        // Final snapshot regardless of checkpoint alignment.
        self.sink.write(&results, &failures).await?;

        let summary = BatchSummary {
            total,
            succeeded: results.len(),
            failed: failures.len(),
        };
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            results = %self.sink.results_path().display(),
            failures = %self.sink.failures_path().display(),
            "batch complete"
        );

        Ok((results, failures, summary))
    }
}
