//! Error handling for the pipeline
//!
//! Process-level errors terminate the run; record-level failures are data and
//! live in [`crate::core::batch::types::FailureRecord`].

use thiserror::Error;

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Fatal, process-level error. Anything that reaches this type aborts the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Regex compilation errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Input file could not be read
    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input file held something other than the expected JSON array
    #[error("Invalid JSON in {path}: {source}")]
    ParseInput {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Checkpoint or output file could not be written
    #[error("Failed to write {path}: {source}")]
    WriteOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
