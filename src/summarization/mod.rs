//! Abstractive report summaries via a hosted chat-completion API.
//!
//! The client speaks the OpenAI-compatible `/chat/completions` protocol, which Groq and most
//! hosted providers expose. Failures are returned as [`SummarizationClientError`] so callers can
//! branch on the failure kind; [`summary_or_marker`] renders any result as a plain string for
//! surfaces that want the in-band `[ERROR]` form.

pub mod prompt;

use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

pub use prompt::{REPORT_SECTIONS, SYSTEM_PROMPT, build_report_prompt};

/// Prefix carried by every in-band error string.
pub const ERROR_MARKER: &str = "[ERROR]";

/// Errors surfaced while attempting abstractive summarization.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider could not be reached or the endpoint does not exist.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider rejected the configured credential.
    #[error("Summarization provider rejected credentials: {0}")]
    Authentication(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

impl SummarizationClientError {
    /// Stable machine-readable name for the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::Authentication(_) => "authentication",
            Self::GenerationFailed(_) => "generation_failed",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Request payload passed to the summarization provider.
#[derive(Debug, Clone)]
pub struct SummarizationRequest {
    /// Fully qualified model identifier understood by the provider.
    pub model: String,
    /// System message framing the task.
    pub system_prompt: String,
    /// User message carrying the report.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f64,
}

impl SummarizationRequest {
    /// Build the medical report request for `report_text`.
    pub fn for_report(model: impl Into<String>, temperature: f64, report_text: &str) -> Self {
        Self {
            model: model.into(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            prompt: build_report_prompt(report_text),
            temperature,
        }
    }
}

/// Interface implemented by abstractive summarization providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Generate a summary using the requested model.
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Render a summarization result as a string, prefixing failures with [`ERROR_MARKER`].
pub fn summary_or_marker<E: Display>(result: Result<String, E>) -> String {
    match result {
        Ok(summary) => summary,
        Err(error) => format!("{ERROR_MARKER} {error}"),
    }
}

/// Client for OpenAI-compatible chat-completion endpoints.
pub struct ChatCompletionClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl ChatCompletionClient {
    /// Build a client for `base_url` authenticating with `api_key`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SummarizationClientError> {
        let http = Client::builder()
            .user_agent("medbrief/summary")
            .timeout(timeout)
            .build()
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, SummarizationClientError> {
        Self::new(
            config.llm_base_url.clone(),
            config.llm_api_key.clone(),
            config.llm_timeout(),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl SummarizationClient for ChatCompletionClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "model": request.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.prompt },
            ],
            "temperature": request.temperature,
            "stream": false,
        });

        tracing::debug!(
            endpoint = %self.endpoint(),
            model = %request.model,
            prompt_chars = request.prompt.len(),
            "Requesting chat completion"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::Authentication(format!(
                "provider returned {status}: {body}"
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode chat completion: {error}"
            ))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                SummarizationClientError::InvalidResponse("response contained no choices".into())
            })?
            .message
            .content
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                SummarizationClientError::InvalidResponse(
                    "first choice carried no message content".into(),
                )
            })?;

        Ok(content)
    }
}
