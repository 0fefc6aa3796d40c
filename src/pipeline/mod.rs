//! The pipelines built on the core
//!
//! Four LLM-driven call sites plus two local post-processing steps, all
//! sharing the batch driver, retry policy, and checkpoint sinks.

pub mod evaluate;
pub mod generate;
pub mod process;
pub mod report;
pub mod respond;
