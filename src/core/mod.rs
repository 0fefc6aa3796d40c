//! Core building blocks shared by all pipelines

pub mod batch;
pub mod client;
pub mod prompts;
pub mod reconcile;
pub mod records;
pub mod retry;
pub mod scoring;
