//! Post-processing of raw model responses
//!
//! Reasoning models wrap their chain of thought in `<think>...</think>` tags
//! ahead of the answer. This pipeline splits each raw response into the two
//! parts; untagged output is kept whole as the answer with an empty chain of
//! thought.

use crate::core::records::{ProcessedRecord, ResponseRecord};
use crate::error::Result;
use crate::storage::{read_records, write_json_atomic};
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

const THINK_PATTERN: &str = r"(?s)<think>(.*?)</think>\s*(.*)";

/// Split a raw response into `(chain_of_thought, answer)`.
pub fn split_output(regex: &Regex, raw: &str) -> (String, String) {
    match regex.captures(raw) {
        Some(caps) => (
            caps[1].trim().to_string(),
            caps[2].trim().to_string(),
        ),
        None => (String::new(), raw.trim().to_string()),
    }
}

pub async fn run(input: &Path, output: &Path) -> Result<()> {
    let regex = Regex::new(THINK_PATTERN)?;
    let records: Vec<ResponseRecord> = read_records(input).await?;
    info!(records = records.len(), input = %input.display(), "splitting responses");

    let mut untagged = 0usize;
    let processed: Vec<ProcessedRecord> = records
        .into_iter()
        .map(|record| {
            let (chain_of_thought, answer) = split_output(&regex, &record.model_output);
            if chain_of_thought.is_empty() {
                untagged += 1;
                debug!(ev_id = %record.ev_id, "no think tags, keeping whole output as answer");
            }
            ProcessedRecord {
                ev_id: record.ev_id,
                aircraft_key: record.aircraft_key,
                narr_accp: record.narr_accp,
                chain_of_thought,
                answer,
            }
        })
        .collect();

    write_json_atomic(output, &processed).await?;
    info!(
        processed = processed.len(),
        untagged,
        output = %output.display(),
        "processed responses written"
    );
    Ok(())
}
