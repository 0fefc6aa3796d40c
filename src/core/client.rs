//! OpenAI-compatible chat completion client
//!
//! One prompt in, one text reply out. The raw transport reply is reduced to a
//! deterministic outcome: the message content, or a [`CallError::Malformed`]
//! when the reply does not carry one. Everything the retry layer needs to know
//! is in the [`CallError`] variants.

use crate::config::ModelConfig;
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A single outbound call failing, in any of the ways the pipeline treats as
/// transient.
#[derive(Error, Debug)]
pub enum CallError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("transport error: {0}")]
    Transport(String),

    /// The configured per-call timeout elapsed
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status from the service
    #[error("api error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Reply parsed but did not carry message content
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Reply carried content that failed the caller's validity check
    #[error("invalid reply: {0}")]
    InvalidReply(String),
}

/// The completion capability the pipelines call into. Production code uses
/// [`ChatClient`]; tests substitute fakes.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Ask the model for a completion of `prompt`, returning the raw reply
    /// text.
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CallError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for one model endpoint. Construction is explicit and scoped to
/// one run; there is no shared global client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    model: String,
    api_base: String,
    api_key: Option<String>,
    temperature: f64,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        if config.api_base.is_empty() {
            return Err(PipelineError::Config(
                "model api_base must not be empty".to_string(),
            ));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            model: config.name.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            timeout,
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> CallError {
        if err.is_timeout() {
            CallError::Timeout(self.timeout)
        } else {
            CallError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl CompletionClient for ChatClient {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CallError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.map_transport(e))?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| CallError::Malformed(format!("invalid completion body: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CallError::Malformed("reply carries no message content".into()))?;

        debug!(model = %self.model, chars = content.len(), "completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::retry::RetryPolicy;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> ModelConfig {
        ModelConfig {
            name: "judge-model".into(),
            api_base: server.uri(),
            api_key: Some("test-key".into()),
            temperature: 0.3,
            timeout_secs: 5,
        }
    }

    fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn complete_sends_chat_request_and_extracts_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "judge-model",
                "temperature": 0.3,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("4")))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatClient::new(&config(&server)).unwrap();
        let reply = client.complete("hello").await.unwrap();
        assert_eq!(reply, "4");
    }

    #[tokio::test]
    async fn missing_content_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": [{"message": {"role": "assistant"}}]})),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(&config(&server)).unwrap();
        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, CallError::Malformed(_)));
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = ChatClient::new(&config(&server)).unwrap();
        match client.complete("hello").await.unwrap_err() {
            CallError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn retry_recovers_from_transient_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("recovered")))
            .mount(&server)
            .await;

        let client = ChatClient::new(&config(&server)).unwrap();
        let policy = RetryPolicy {
            max_attempts: 3,
            base: std::time::Duration::from_millis(1),
            min_delay: std::time::Duration::from_millis(1),
            max_delay: std::time::Duration::from_millis(5),
        };

        let reply = policy
            .run(|| async { client.complete("hello").await })
            .await
            .unwrap();
        assert_eq!(reply, "recovered");
    }

    #[tokio::test]
    async fn empty_api_base_is_a_config_error() {
        let config = ModelConfig {
            name: "m".into(),
            api_base: String::new(),
            api_key: None,
            temperature: 0.3,
            timeout_secs: 120,
        };
        assert!(ChatClient::new(&config).is_err());
    }
}
