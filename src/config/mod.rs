//! Run configuration
//!
//! Everything the original scripts kept as inline constants lives here:
//! model endpoint, sampling temperature, call timeout, concurrency cap,
//! checkpoint interval, and the retry schedule. Loaded from a YAML file with
//! an environment override for the credential, so no secret ends up in the
//! config file.

use crate::core::batch::BatchConfig;
use crate::core::retry::RetryPolicy;
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

fn default_temperature() -> f64 {
    0.3
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_concurrency() -> usize {
    20
}

fn default_checkpoint_every() -> usize {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_secs() -> u64 {
    1
}

fn default_min_secs() -> u64 {
    2
}

fn default_max_secs() -> u64 {
    10
}

/// One model endpoint: the generator or judge the pipelines talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier as the service knows it
    pub name: String,
    /// Base URL of the OpenAI-compatible API, e.g. `http://host:11434/v1`
    pub api_base: String,
    /// Credential; prefer the `COT_EVAL_API_KEY` environment variable
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// One answering model of the `respond` pipeline, plus where its output goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondentConfig {
    #[serde(flatten)]
    pub model: ModelConfig,
    /// Output file for this model's responses
    pub output: PathBuf,
}

/// Batch settings shared by all pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Snapshot cadence in successes; 0 disables periodic snapshots
    #[serde(default = "default_checkpoint_every")]
    pub checkpoint_every: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            checkpoint_every: default_checkpoint_every(),
        }
    }
}

/// Retry schedule settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_secs")]
    pub base_secs: u64,
    #[serde(default = "default_min_secs")]
    pub min_secs: u64,
    #[serde(default = "default_max_secs")]
    pub max_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_secs: default_base_secs(),
            min_secs: default_min_secs(),
            max_secs: default_max_secs(),
        }
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Endpoint used by `generate` and `evaluate`
    pub model: ModelConfig,
    /// Models queried by `respond`
    #[serde(default)]
    pub respondents: Vec<RespondentConfig>,
    #[serde(default)]
    pub batch: BatchSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

impl PipelineConfig {
    /// Load from a YAML file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PipelineError::ReadInput {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Self = serde_yaml::from_str(&text)?;
        config.apply_env();
        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// `COT_EVAL_API_KEY` overrides every configured credential.
    fn apply_env(&mut self) {
        if let Ok(key) = env::var("COT_EVAL_API_KEY") {
            self.model.api_key = Some(key.clone());
            for respondent in &mut self.respondents {
                respondent.model.api_key = Some(key.clone());
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.model.api_base.is_empty() {
            return Err(PipelineError::Config(
                "model.api_base must not be empty".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(PipelineError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.retry.min_secs > self.retry.max_secs {
            return Err(PipelineError::Config(
                "retry.min_secs must not exceed retry.max_secs".to_string(),
            ));
        }
        Ok(())
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig::new()
            .with_concurrency(self.batch.concurrency)
            .with_checkpoint_every(self.batch.checkpoint_every)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            base: Duration::from_secs(self.retry.base_secs),
            min_delay: Duration::from_secs(self.retry.min_secs),
            max_delay: Duration::from_secs(self.retry.max_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_fills_defaults() {
        let yaml = r#"
model:
  name: deepseek-v3
  api_base: http://localhost:8000/v1
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.model.temperature, 0.3);
        assert_eq!(config.model.timeout_secs, 120);
        assert_eq!(config.batch.concurrency, 20);
        assert_eq!(config.batch.checkpoint_every, 10);
        assert_eq!(config.retry.max_attempts, 3);
        assert!(config.respondents.is_empty());
    }

    #[test]
    fn respondents_flatten_model_fields() {
        let yaml = r#"
model:
  name: judge
  api_base: http://localhost:8000/v1
respondents:
  - name: gpt-oss-20b
    api_base: http://192.168.2.4:11434/v1
    output: results/gpt-oss-20b.json
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.respondents.len(), 1);
        assert_eq!(config.respondents[0].model.name, "gpt-oss-20b");
        assert_eq!(
            config.respondents[0].output,
            PathBuf::from("results/gpt-oss-20b.json")
        );
    }

    #[test]
    fn retry_policy_reflects_settings() {
        let yaml = r#"
model:
  name: judge
  api_base: http://localhost:8000/v1
retry:
  max_attempts: 5
  base_secs: 2
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base, Duration::from_secs(2));
        assert_eq!(policy.min_delay, Duration::from_secs(2));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
    }

    #[test]
    fn inverted_retry_bounds_are_rejected() {
        let yaml = r#"
model:
  name: judge
  api_base: http://localhost:8000/v1
retry:
  min_secs: 20
  max_secs: 10
"#;
        let mut config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        config.apply_env();
        assert!(config.validate().is_err());
    }
}
