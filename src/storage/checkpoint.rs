//! Checkpoint sinks and JSON file helpers

use crate::core::batch::types::FailureRecord;
use crate::error::{PipelineError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serialize with a 4-space indent, matching the dataset files already on
/// disk. Non-ASCII text passes through unescaped. Output is deterministic for
/// a fixed input ordering: struct fields serialize in declaration order.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write a JSON document so that the target path never holds a partial file:
/// the bytes land in a sibling temp file first and are renamed into place.
pub async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = to_json_pretty(value)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PipelineError::WriteOutput {
                    path: parent.display().to_string(),
                    source: e,
                })?;
        }
    }

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| PipelineError::WriteOutput {
            path: tmp.display().to_string(),
            source: e,
        })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| PipelineError::WriteOutput {
            path: path.display().to_string(),
            source: e,
        })?;

    debug!(path = %path.display(), "wrote {} bytes", bytes.len());
    Ok(())
}

/// Read a JSON array of records from disk.
pub async fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| PipelineError::ReadInput {
            path: path.display().to_string(),
            source: e,
        })?;
    serde_json::from_slice(&bytes).map_err(|e| PipelineError::ParseInput {
        path: path.display().to_string(),
        source: e,
    })
}

/// The two durable sinks of one batch run: all successes so far, and the
/// failure subset. Every write is a full overwrite of both files; the two
/// writes are sequential, never interleaved.
#[derive(Debug, Clone)]
pub struct CheckpointSink {
    results_path: PathBuf,
    failures_path: PathBuf,
}

impl CheckpointSink {
    pub fn new(results_path: impl Into<PathBuf>, failures_path: impl Into<PathBuf>) -> Self {
        Self {
            results_path: results_path.into(),
            failures_path: failures_path.into(),
        }
    }

    pub fn results_path(&self) -> &Path {
        &self.results_path
    }

    pub fn failures_path(&self) -> &Path {
        &self.failures_path
    }

    /// Snapshot both sequences. A crash between the two writes can leave the
    /// sinks mutually inconsistent; the final write at the end of the batch
    /// supersedes any periodic snapshot.
    pub async fn write<T: Serialize>(
        &self,
        results: &[T],
        failures: &[FailureRecord],
    ) -> Result<()> {
        write_json_atomic(&self.results_path, &results).await?;
        write_json_atomic(&self.failures_path, &failures).await?;
        Ok(())
    }
}
