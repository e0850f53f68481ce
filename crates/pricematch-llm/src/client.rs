//! HTTP client for an OpenAI-compatible chat-completions endpoint.
//!
//! Every call asks for a JSON object answer (`response_format`), so the
//! client hands back the model's reply already parsed as
//! [`serde_json::Value`]. Interpreting that value belongs to the capability
//! adapters in [`crate::suggest`].

use std::time::Duration;

use pricematch_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::LlmError;
use crate::retry::retry_with_backoff;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MAX_RETRIES: u32 = 1;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// Client for chat completions with JSON-mode answers.
///
/// Use [`LlmClient::new`] for the default endpoint or
/// [`LlmClient::with_base_url`] to point at a mock server in tests.
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    completions_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("completions_url", &self.completions_url.as_str())
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Creates a client for the default endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL such as
    /// `https://api.groq.com/openai/v1`; `/chat/completions` is appended.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`LlmError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pricematch/0.1 (grocery-price-comparison)")
            .build()?;

        let joined = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let completions_url = Url::parse(&joined).map_err(|e| LlmError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            completions_url,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Builds a client from application config, or `None` when no API key
    /// is configured.
    ///
    /// # Errors
    ///
    /// Same as [`LlmClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Option<Self>, LlmError> {
        let Some(api_key) = config.llm_api_key.as_deref() else {
            return Ok(None);
        };
        let client = Self::with_base_url(
            api_key,
            &config.llm_model,
            config.llm_timeout_secs,
            &config.llm_base_url,
        )?
        .with_retry(config.llm_max_retries, config.llm_retry_backoff_base_ms);
        Ok(Some(client))
    }

    /// Overrides the retry policy for transient failures.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Sends one system + user exchange and returns the model's answer
    /// parsed as JSON.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Status`] on a non-2xx response (after retries for 429/5xx).
    /// - [`LlmError::Http`] on network failure or timeout.
    /// - [`LlmError::Deserialize`] if the envelope or the answer is not JSON.
    /// - [`LlmError::EmptyResponse`] if the completion has no content.
    pub async fn chat_json(
        &self,
        system: &str,
        user: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<serde_json::Value, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
            response_format: ResponseFormat::json_object(),
        };

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.send_once(&request)
        })
        .await
    }

    async fn send_once(&self, request: &ChatRequest<'_>) -> Result<serde_json::Value, LlmError> {
        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Deserialize {
                context: "chat completion envelope".to_string(),
                source: e,
            })?;
        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        tracing::debug!(model = %self.model, bytes = content.len(), "received chat completion");

        serde_json::from_str(&content).map_err(|e| LlmError::Deserialize {
            context: "chat completion content".to_string(),
            source: e,
        })
    }
}
