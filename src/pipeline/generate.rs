//! Chain-of-thought generation
//!
//! For every accident narrative, ask the model for the step-numbered
//! reasoning chain connecting the narrative to the official conclusion.

use crate::config::PipelineConfig;
use crate::core::batch::{BatchDriver, BatchSummary, TaskError, TaskResult};
use crate::core::client::{CallError, ChatClient, CompletionClient};
use crate::core::prompts;
use crate::core::records::{CotRecord, NarrativeRecord};
use crate::core::retry::RetryPolicy;
use crate::error::Result;
use crate::storage::{read_records, CheckpointSink};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub async fn run(
    config: &PipelineConfig,
    input: &Path,
    output: &Path,
    failures: &Path,
) -> Result<BatchSummary> {
    let records: Vec<NarrativeRecord> = read_records(input).await?;
    info!(
        count = records.len(),
        "accident records loaded, generating chains of thought"
    );

    let client = Arc::new(ChatClient::new(&config.model)?);
    let policy = config.retry_policy();
    let driver = BatchDriver::new(config.batch_config(), CheckpointSink::new(output, failures));

    let (_, _, summary) = driver
        .run(records, |record: NarrativeRecord| {
            let client = client.clone();
            let policy = policy.clone();
            async move { generate_one(client.as_ref(), &policy, &record).await }
        })
        .await?;

    Ok(summary)
}

/// Generate the chain of thought for one record. The reply must be non-empty
/// text; an empty completion consumes a retry attempt like any transient
/// failure.
pub async fn generate_one<C>(
    client: &C,
    policy: &RetryPolicy,
    record: &NarrativeRecord,
) -> TaskResult<CotRecord>
where
    C: CompletionClient + ?Sized,
{
    let narrative = format!("{}\n\n{}", record.narr_accp, record.narr_accf);
    let prompt = prompts::cot_generation(&narrative, &record.narr_cause);

    let reply = policy
        .run(|| async {
            let text = client.complete(&prompt).await?;
            let text = text.trim();
            if text.is_empty() {
                return Err(CallError::InvalidReply("empty completion".to_string()));
            }
            Ok(text.to_string())
        })
        .await
        .map_err(|e| TaskError::new("generate_cot", e))?;

    Ok(CotRecord {
        ev_id: record.ev_id.clone(),
        aircraft_key: record.aircraft_key.clone(),
        chain_of_thought: reply,
    })
}
