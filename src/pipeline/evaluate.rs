//! Rubric scoring of generated CoT and answers
//!
//! Generated records are matched against the ground-truth narratives by key
//! before scoring; an unmatched record is an explicit failure entry, never a
//! silent drop. Individual metric failures stay inside the record's score set
//! so one bad judge call does not discard the other metrics.

use crate::config::PipelineConfig;
use crate::core::batch::{BatchDriver, BatchSummary, TaskError, TaskResult};
use crate::core::client::{ChatClient, CompletionClient};
use crate::core::prompts;
use crate::core::reconcile::ReconcileIndex;
use crate::core::records::{GeneratedRecord, Keyed, NarrativeRecord, RecordKey, ScoreRecord};
use crate::core::retry::RetryPolicy;
use crate::core::scoring::{ask_score, record_metric_error, ContrastScores, CotScores};
use crate::error::Result;
use crate::storage::{read_records, CheckpointSink};
use clap::ValueEnum;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which dataset pairing is being scored.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvalMode {
    /// Generated chains of thought, keyed by event id, five CoT metrics
    Cot,
    /// Candidate-model answers, keyed by event id + aircraft key, answer
    /// metrics plus CoT metrics when a chain of thought is present
    Contrast,
}

/// A generated record paired with the key shape of the active mode.
struct EvalItem {
    key: RecordKey,
    record: GeneratedRecord,
}

impl Keyed for EvalItem {
    fn key(&self) -> RecordKey {
        self.key.clone()
    }
}

pub async fn run(
    config: &PipelineConfig,
    mode: EvalMode,
    generated: &Path,
    ground_truth: &Path,
    output: &Path,
    failures: &Path,
) -> Result<BatchSummary> {
    let generated: Vec<GeneratedRecord> = read_records(generated).await?;
    let truth: Vec<NarrativeRecord> = read_records(ground_truth).await?;
    info!(
        generated = generated.len(),
        ground_truth = truth.len(),
        ?mode,
        "datasets loaded, matching and scoring"
    );

    let key_of_generated = |r: &GeneratedRecord| match mode {
        EvalMode::Cot => RecordKey::event(r.ev_id.clone()),
        EvalMode::Contrast => RecordKey {
            ev_id: r.ev_id.clone(),
            aircraft_key: r.aircraft_key.clone(),
        },
    };
    let index = Arc::new(match mode {
        EvalMode::Cot => ReconcileIndex::build(truth, |r| RecordKey::event(r.ev_id.clone())),
        EvalMode::Contrast => ReconcileIndex::build(truth, |r| r.key()),
    });

    let items: Vec<EvalItem> = generated
        .into_iter()
        .map(|record| EvalItem {
            key: key_of_generated(&record),
            record,
        })
        .collect();

    let client = Arc::new(ChatClient::new(&config.model)?);
    let policy = config.retry_policy();
    let driver = BatchDriver::new(config.batch_config(), CheckpointSink::new(output, failures));

    let summary = match mode {
        EvalMode::Cot => {
            let (_, _, summary) = driver
                .run(items, |item: EvalItem| {
                    let client = client.clone();
                    let policy = policy.clone();
                    let index = index.clone();
                    async move { score_cot_item(client.as_ref(), &policy, &index, item).await }
                })
                .await?;
            summary
        }
        EvalMode::Contrast => {
            let (_, _, summary) = driver
                .run(items, |item: EvalItem| {
                    let client = client.clone();
                    let policy = policy.clone();
                    let index = index.clone();
                    async move { score_contrast_item(client.as_ref(), &policy, &index, item).await }
                })
                .await?;
            summary
        }
    };

    Ok(summary)
}

fn lookup<'a>(
    index: &'a ReconcileIndex,
    key: &RecordKey,
) -> TaskResult<&'a NarrativeRecord> {
    index.lookup(key).ok_or_else(|| {
        TaskError::new(
            "reconcile",
            format!("no matching ground-truth record for key {key}"),
        )
    })
}

/// Score one judge metric; a failed call is recorded in the score set's
/// error field and the metric stays null.
async fn score_metric<C>(
    client: &C,
    policy: &RetryPolicy,
    errors: &mut Option<String>,
    metric: &str,
    prompt: String,
) -> Option<f64>
where
    C: CompletionClient + ?Sized,
{
    match ask_score(client, policy, &prompt).await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(metric, %err, "metric scoring failed");
            record_metric_error(errors, metric, err);
            None
        }
    }
}

async fn score_cot_item<C>(
    client: &C,
    policy: &RetryPolicy,
    index: &ReconcileIndex,
    item: EvalItem,
) -> TaskResult<ScoreRecord<CotScores>>
where
    C: CompletionClient + ?Sized,
{
    let truth = lookup(index, &item.key)?;
    let narrative = truth.narrative();
    let cause = &truth.narr_cause;
    let cot = &item.record.chain_of_thought;

    let mut scores = CotScores::default();
    scores.faithfulness = score_metric(
        client,
        policy,
        &mut scores.error,
        "faithfulness",
        prompts::faithfulness(&narrative, cot),
    )
    .await;
    scores.logicality = score_metric(
        client,
        policy,
        &mut scores.error,
        "logicality",
        prompts::logicality(&narrative, cot),
    )
    .await;
    scores.support = score_metric(
        client,
        policy,
        &mut scores.error,
        "support",
        prompts::support(&narrative, cot, cause),
    )
    .await;
    scores.completeness = score_metric(
        client,
        policy,
        &mut scores.error,
        "completeness",
        prompts::completeness(&narrative, cot),
    )
    .await;
    scores.ntsb_style = score_metric(
        client,
        policy,
        &mut scores.error,
        "ntsb_style",
        prompts::ntsb_style(cot),
    )
    .await;

    Ok(ScoreRecord {
        ev_id: item.record.ev_id,
        aircraft_key: None,
        scores,
    })
}

async fn score_contrast_item<C>(
    client: &C,
    policy: &RetryPolicy,
    index: &ReconcileIndex,
    item: EvalItem,
) -> TaskResult<ScoreRecord<ContrastScores>>
where
    C: CompletionClient + ?Sized,
{
    let truth = lookup(index, &item.key)?;
    let narrative = truth.narrative();
    let cause = &truth.narr_cause;

    let answer = item.record.answer_text();
    if answer.trim().is_empty() {
        return Err(TaskError::new("score", "record has no answer text"));
    }

    let mut scores = ContrastScores::default();
    scores.causal_accuracy = score_metric(
        client,
        policy,
        &mut scores.error,
        "causal_accuracy",
        prompts::causal_accuracy(&narrative, answer, cause),
    )
    .await;
    scores.causal_completeness = score_metric(
        client,
        policy,
        &mut scores.error,
        "causal_completeness",
        prompts::causal_completeness(&narrative, answer, cause),
    )
    .await;
    scores.causal_precision = score_metric(
        client,
        policy,
        &mut scores.error,
        "causal_precision",
        prompts::causal_precision(&narrative, answer),
    )
    .await;
    scores.cause_alignment = score_metric(
        client,
        policy,
        &mut scores.error,
        "cause_alignment",
        prompts::cause_alignment(&narrative, answer, cause),
    )
    .await;

    let cot = item.record.chain_of_thought.trim();
    if cot.is_empty() {
        debug!(key = %item.key, "chain of thought is empty, skipping CoT metrics");
    } else {
        scores.faithfulness = score_metric(
            client,
            policy,
            &mut scores.error,
            "faithfulness",
            prompts::faithfulness(&narrative, cot),
        )
        .await;
        scores.logicality = score_metric(
            client,
            policy,
            &mut scores.error,
            "logicality",
            prompts::logicality(&narrative, cot),
        )
        .await;
        scores.support = score_metric(
            client,
            policy,
            &mut scores.error,
            "support",
            prompts::support(&narrative, cot, cause),
        )
        .await;
        scores.completeness = score_metric(
            client,
            policy,
            &mut scores.error,
            "completeness",
            prompts::completeness(&narrative, cot),
        )
        .await;
        scores.ntsb_style = score_metric(
            client,
            policy,
            &mut scores.error,
            "ntsb_style",
            prompts::ntsb_style(cot),
        )
        .await;
    }

    Ok(ScoreRecord {
        ev_id: item.record.ev_id,
        aircraft_key: item.record.aircraft_key,
        scores,
    })
}
