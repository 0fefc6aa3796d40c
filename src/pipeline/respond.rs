//! Answer generation against one or more candidate models
//!
//! Each configured respondent model is run over the full dataset in turn;
//! its raw answers land in that model's own output file. Records with an
//! empty narrative become explicit failure entries rather than silent skips.

use crate::config::{PipelineConfig, RespondentConfig};
use crate::core::batch::{BatchDriver, BatchSummary, TaskError, TaskResult};
use crate::core::client::{CallError, ChatClient, CompletionClient};
use crate::core::prompts;
use crate::core::records::{NarrativeRecord, ResponseRecord};
use crate::core::retry::RetryPolicy;
use crate::error::Result;
use crate::storage::{read_records, CheckpointSink};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Failure file path for a results file, `x.json` -> `x_fail.json`.
pub fn failure_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{stem}_fail.json"))
}

pub async fn run(config: &PipelineConfig, input: &Path) -> Result<Vec<BatchSummary>> {
    let records: Vec<NarrativeRecord> = read_records(input).await?;
    info!(count = records.len(), "narrative records loaded");

    let mut summaries = Vec::with_capacity(config.respondents.len());
    for respondent in &config.respondents {
        info!(
            model = %respondent.model.name,
            api_base = %respondent.model.api_base,
            "querying respondent model"
        );
        let summary = run_one_model(config, respondent, records.clone()).await?;
        summaries.push(summary);
    }

    info!("all respondent models processed");
    Ok(summaries)
}

async fn run_one_model(
    config: &PipelineConfig,
    respondent: &RespondentConfig,
    records: Vec<NarrativeRecord>,
) -> Result<BatchSummary> {
    let client = Arc::new(ChatClient::new(&respondent.model)?);
    let policy = config.retry_policy();
    let model_name = respondent.model.name.clone();
    let sink = CheckpointSink::new(respondent.output.clone(), failure_path(&respondent.output));
    let driver = BatchDriver::new(config.batch_config(), sink);

    let (_, _, summary) = driver
        .run(records, |record: NarrativeRecord| {
            let client = client.clone();
            let policy = policy.clone();
            let model_name = model_name.clone();
            async move { respond_one(client.as_ref(), &policy, &model_name, &record).await }
        })
        .await?;

    Ok(summary)
}

/// Ask one model for the accident cause behind one narrative.
pub async fn respond_one<C>(
    client: &C,
    policy: &RetryPolicy,
    model_name: &str,
    record: &NarrativeRecord,
) -> TaskResult<ResponseRecord>
where
    C: CompletionClient + ?Sized,
{
    if record.narr_accp.is_empty() {
        return Err(TaskError::new("respond", "record has no narrative text"));
    }

    let prompt = prompts::response_generation(&record.narr_accp);
    let reply = policy
        .run(|| async {
            let text = client.complete(&prompt).await?;
            if text.trim().is_empty() {
                return Err(CallError::InvalidReply("empty completion".to_string()));
            }
            Ok(text)
        })
        .await
        .map_err(|e| TaskError::new("respond", e))?;

    Ok(ResponseRecord {
        ev_id: record.ev_id.clone(),
        aircraft_key: record.aircraft_key.clone(),
        narr_accp: record.narr_accp.clone(),
        model_output: reply,
        model_name: model_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    struct EchoModel;

    #[async_trait]
    impl CompletionClient for EchoModel {
        async fn complete(&self, _prompt: &str) -> std::result::Result<String, CallError> {
            Ok("Loss of engine power due to fuel exhaustion.".to_string())
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            base: Duration::from_millis(1),
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn response_record_carries_model_name_and_narrative() {
        let record = NarrativeRecord {
            ev_id: "e1".into(),
            aircraft_key: Some("1".into()),
            narr_accp: "The engine lost power.".into(),
            narr_accf: String::new(),
            narr_cause: String::new(),
        };

        let out = respond_one(&EchoModel, &policy(), "gpt-oss-20b", &record)
            .await
            .unwrap();
        assert_eq!(out.model_name, "gpt-oss-20b");
        assert_eq!(out.narr_accp, "The engine lost power.");
        assert_eq!(out.aircraft_key.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn empty_narrative_is_an_explicit_failure() {
        let record = NarrativeRecord {
            ev_id: "e1".into(),
            aircraft_key: None,
            narr_accp: String::new(),
            narr_accf: String::new(),
            narr_cause: String::new(),
        };

        let err = respond_one(&EchoModel, &policy(), "m", &record)
            .await
            .unwrap_err();
        assert_eq!(err.operation, "respond");
        assert!(err.message.contains("no narrative text"));
    }

    #[test]
    fn failure_path_appends_fail_suffix() {
        assert_eq!(
            failure_path(Path::new("results/gpt-oss-20b.json")),
            PathBuf::from("results/gpt-oss-20b_fail.json")
        );
    }
}
