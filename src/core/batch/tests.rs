//! Tests for the batch driver

use super::driver::BatchDriver;
use super::types::{BatchConfig, FailureRecord, TaskError, TaskResult};
use crate::core::records::{Keyed, RecordKey};
use crate::storage::{read_records, CheckpointSink};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Item {
    id: usize,
}

impl Keyed for Item {
    fn key(&self) -> RecordKey {
        RecordKey::event(format!("rec-{}", self.id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Payload {
    ev_id: String,
    value: usize,
}

fn items(n: usize) -> Vec<Item> {
    (0..n).map(|id| Item { id }).collect()
}

fn sink(dir: &tempfile::TempDir) -> CheckpointSink {
    CheckpointSink::new(dir.path().join("results.json"), dir.path().join("fail.json"))
}

async fn double(item: Item) -> TaskResult<Payload> {
    Ok(Payload {
        ev_id: format!("rec-{}", item.id),
        value: item.id * 2,
    })
}

#[tokio::test]
async fn one_outcome_per_record_no_duplicates() {
    for concurrency in [1, 3, 16] {
        let dir = tempfile::tempdir().unwrap();
        let driver = BatchDriver::new(
            BatchConfig::new().with_concurrency(concurrency),
            sink(&dir),
        );

        let (results, failures, summary) = driver.run(items(25), double).await.unwrap();

        assert_eq!(summary.total, 25);
        assert_eq!(results.len() + failures.len(), 25);
        assert!(failures.is_empty());

        let keys: HashSet<_> = results.iter().map(|p| p.ev_id.clone()).collect();
        assert_eq!(keys.len(), 25, "distinct key per outcome");
    }
}

#[tokio::test]
async fn all_failing_tasks_still_complete_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let driver = BatchDriver::new(BatchConfig::new().with_concurrency(4), sink(&dir));

    let (results, failures, summary) = driver
        .run(items(10), |_item: Item| async {
            Err::<Payload, _>(TaskError::new("generate_cot", "model unreachable"))
        })
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(failures.len(), 10);
    assert_eq!(summary.failed, 10);
    assert!(failures
        .iter()
        .all(|f| f.error == "generate_cot: model unreachable"));
}

#[tokio::test]
async fn panicking_task_becomes_a_failure_entry() {
    let dir = tempfile::tempdir().unwrap();
    let driver = BatchDriver::new(BatchConfig::new().with_concurrency(2), sink(&dir));

    let (results, failures, _) = driver
        .run(items(5), |item: Item| async move {
            if item.id == 3 {
                panic!("unexpected state");
            }
            double(item).await
        })
        .await
        .unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].ev_id, "rec-3");
    assert!(failures[0].error.contains("task panicked"));
    assert!(failures[0].error.contains("unexpected state"));
}

#[tokio::test]
async fn completion_order_not_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let driver = BatchDriver::new(BatchConfig::new().with_concurrency(4), sink(&dir));

    // The first record sleeps long enough that later records finish first.
    let (results, _, _) = driver
        .run(items(4), |item: Item| async move {
            if item.id == 0 {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            double(item).await
        })
        .await
        .unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(results.last().unwrap().ev_id, "rec-0");
}

#[tokio::test]
async fn checkpoints_are_written_periodically_and_at_the_end() {
    let dir = tempfile::tempdir().unwrap();
    let s = sink(&dir);
    let driver = BatchDriver::new(
        BatchConfig::new().with_concurrency(1).with_checkpoint_every(2),
        s.clone(),
    );

    let writes = AtomicUsize::new(0);
    let results_path = s.results_path().to_path_buf();

    // With serial execution, the snapshot grows by exactly K between
    // periodic writes; observe the file after the 2nd success.
    let (results, failures, _) = driver
        .run(items(5), |item: Item| {
            let results_path = results_path.clone();
            let writes = &writes;
            async move {
                if item.id == 2 {
                    // Records 0 and 1 succeeded, so one periodic snapshot of
                    // size 2 must already be durable.
                    let on_disk: Vec<Payload> = read_records(&results_path).await.unwrap();
                    assert_eq!(on_disk.len(), 2);
                    writes.fetch_add(1, Ordering::SeqCst);
                }
                double(item).await
            }
        })
        .await
        .unwrap();

    assert_eq!(writes.load(Ordering::SeqCst), 1, "mid-run assertion ran");
    assert_eq!(results.len(), 5);
    assert!(failures.is_empty());

    // Final write covers all 5 even though 5 is not a multiple of 2.
    let on_disk: Vec<Payload> = read_records(s.results_path()).await.unwrap();
    assert_eq!(on_disk.len(), 5);
    let fails: Vec<FailureRecord> = read_records(s.failures_path()).await.unwrap();
    assert!(fails.is_empty());
}

#[tokio::test]
async fn results_file_holds_successes_only() {
    let dir = tempfile::tempdir().unwrap();
    let s = sink(&dir);
    let driver = BatchDriver::new(BatchConfig::new().with_concurrency(2), s.clone());

    driver
        .run(items(6), |item: Item| async move {
            if item.id % 2 == 0 {
                Err(TaskError::new("score", "invalid reply"))
            } else {
                double(item).await
            }
        })
        .await
        .unwrap();

    let on_disk: Vec<Payload> = read_records(s.results_path()).await.unwrap();
    assert_eq!(on_disk.len(), 3);
    let fails: Vec<FailureRecord> = read_records(s.failures_path()).await.unwrap();
    assert_eq!(fails.len(), 3);
    assert!(fails.iter().all(|f| f.error == "score: invalid reply"));
}

#[tokio::test]
async fn checkpointing_disabled_still_writes_final_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let s = sink(&dir);
    let driver = BatchDriver::new(
        BatchConfig::new().with_concurrency(2).with_checkpoint_every(0),
        s.clone(),
    );

    driver.run(items(3), double).await.unwrap();

    let on_disk: Vec<Payload> = read_records(s.results_path()).await.unwrap();
    assert_eq!(on_disk.len(), 3);
}

#[test]
fn config_builder_clamps_concurrency() {
    let config = BatchConfig::new().with_concurrency(0);
    assert_eq!(config.concurrency, 1);

    let config = BatchConfig::new().with_checkpoint_every(0);
    assert_eq!(config.checkpoint_every, None);
}
