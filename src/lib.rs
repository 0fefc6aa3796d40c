//! # cot-eval
//!
//! Batch generation and rubric evaluation of chain-of-thought reasoning for
//! NTSB aviation accident reports.
//!
//! ## Features
//!
//! - **Bounded Concurrency**: All LLM calls run through a batch driver with a
//!   fixed concurrency ceiling and periodic checkpointing
//! - **Failure Isolation**: A failing or panicking record becomes a failure
//!   entry; the rest of the batch is unaffected
//! - **Resilient Calls**: Exponential-backoff retries around every model call,
//!   including malformed rubric replies
//! - **Deterministic Checkpoints**: Atomic full-snapshot JSON writes that are
//!   byte-identical for identical state
//!
//! ## Pipelines
//!
//! - `generate` - chains of thought from accident narratives
//! - `respond` - candidate-model answers for the same narratives
//! - `process` - split raw responses on `<think>` tags
//! - `evaluate` - rubric scoring in `cot` or `contrast` mode
//! - `report` - per-metric averages over a directory of score files

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod storage;

pub use crate::config::PipelineConfig;
pub use crate::core::batch::{BatchConfig, BatchDriver, BatchSummary, FailureRecord};
pub use crate::core::client::{ChatClient, CompletionClient};
pub use crate::core::retry::RetryPolicy;
pub use crate::error::{PipelineError, Result};
