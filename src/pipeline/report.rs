//! Aggregation of score files into per-metric averages
//!
//! Every `*.json` score file in a directory is summarized independently.
//! Each metric keeps its own sample count: a record where a metric is null
//! contributes to the other metrics but not to that one, so partial failures
//! never drag an average toward zero.

use crate::error::{PipelineError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Running sum and sample count for one metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricStat {
    pub sum: f64,
    pub count: usize,
}

impl MetricStat {
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Per-metric averages for one score file.
#[derive(Debug, Default)]
pub struct FileSummary {
    pub records: usize,
    pub metrics: BTreeMap<String, MetricStat>,
}

/// Fold one file's score records into per-metric statistics. Only numeric
/// entries under `scores` are counted; nulls and error strings are skipped.
pub fn summarize_records(records: &[Value]) -> FileSummary {
    let mut summary = FileSummary {
        records: records.len(),
        ..Default::default()
    };
    for record in records {
        let Some(scores) = record.get("scores").and_then(Value::as_object) else {
            continue;
        };
        for (metric, value) in scores {
            if let Some(v) = value.as_f64() {
                let stat = summary.metrics.entry(metric.clone()).or_default();
                stat.sum += v;
                stat.count += 1;
            }
        }
    }
    summary
}

fn is_score_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".json") && !name.ends_with("_fail.json")
}

/// Collect the score files in `dir`, sorted by name for stable output.
fn score_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_score_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub async fn run(dir: &Path) -> Result<()> {
    let files = score_files(dir)?;
    if files.is_empty() {
        return Err(PipelineError::Config(format!(
            "no score files found in {}",
            dir.display()
        )));
    }
    info!(files = files.len(), dir = %dir.display(), "aggregating score files");

    for path in files {
        let records: Vec<Value> = crate::storage::read_records(&path).await?;
        let summary = summarize_records(&records);
        if summary.metrics.is_empty() {
            warn!(file = %path.display(), "no numeric scores found");
        }

        println!("\n{} ({} records)", path.display(), summary.records);
        for (metric, stat) in &summary.metrics {
            println!("  {:<22} {:.4}  (n={})", metric, stat.average(), stat.count);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metrics_average_over_their_own_sample_counts() {
        let records = vec![
            json!({"ev_id": "A", "scores": {"faithfulness": 1.0, "support": 0.5}}),
            json!({"ev_id": "B", "scores": {"faithfulness": 1.0, "support": null}}),
            json!({"ev_id": "C", "scores": {"faithfulness": 1.0}}),
            json!({"ev_id": "D", "scores": {"support": 0.25, "error": "support:timeout"}}),
            json!({"ev_id": "E", "scores": {}}),
        ];
        let summary = summarize_records(&records);

        assert_eq!(summary.records, 5);
        let faithfulness = summary.metrics["faithfulness"];
        assert_eq!(faithfulness.count, 3);
        assert_eq!(faithfulness.average(), 1.0);

        let support = summary.metrics["support"];
        assert_eq!(support.count, 2);
        assert_eq!(support.average(), 0.375);

        assert!(!summary.metrics.contains_key("error"));
    }

    #[test]
    fn records_without_scores_are_skipped() {
        let records = vec![json!({"ev_id": "A"}), json!({"ev_id": "B", "scores": 3})];
        let summary = summarize_records(&records);
        assert_eq!(summary.records, 2);
        assert!(summary.metrics.is_empty());
    }

    #[test]
    fn failure_files_are_not_score_files() {
        assert!(is_score_file(Path::new("/out/cot_scores.json")));
        assert!(!is_score_file(Path::new("/out/cot_scores_fail.json")));
        assert!(!is_score_file(Path::new("/out/notes.txt")));
    }

    #[test]
    fn empty_metric_averages_to_zero() {
        assert_eq!(MetricStat::default().average(), 0.0);
    }
}
