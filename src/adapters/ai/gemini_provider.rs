//! Gemini Provider - Implementation of AIProvider for Google's Gemini API.
//!
//! Uses the stateless `generateContent` endpoint: the prior transcript is
//! sent as `contents` on every call, followed by the new user prompt.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-1.5-flash")
//!     .with_timeout(Duration::from_secs(20));
//!
//! let provider = GeminiProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::{GenerationConfig, Message, MessageRole};
use crate::ports::{
    AIError, AIProvider, ChatRequest, ChatResponse, FinishReason, ProviderInfo, TokenUsage,
};

/// Default models root.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model.
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Retry delay used when a 429 carries no hint.
const DEFAULT_RETRY_AFTER_SECS: u32 = 60;

/// Longest 429 hint worth waiting for; longer hints fail the call at once.
const MAX_RETRY_AFTER_SECS: u32 = 5;

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-1.5-flash").
    pub model: String,
    /// Models root (default: https://generativelanguage.googleapis.com/v1beta/models).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: GEMINI_DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            timeout: Duration::from_secs(20),
            max_retries: 2,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    ///
    /// Fails if the API key is blank or the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        if config.api_key().trim().is_empty() {
            return Err(AIError::Initialization("Gemini API key is empty".to_string()));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::Initialization(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the generateContent endpoint URL.
    fn generate_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Converts our request to Gemini's format.
    fn to_gemini_request(request: &ChatRequest) -> GenerateContentRequest {
        let mut contents: Vec<GeminiContent> =
            request.history.iter().map(GeminiContent::from_message).collect();
        contents.push(GeminiContent::text(MessageRole::User, &request.prompt));

        GenerateContentRequest {
            contents,
            generation_config: request.generation,
        }
    }

    /// Sends a request.
    async fn send_request(&self, request: &ChatRequest) -> Result<Response, AIError> {
        let body = Self::to_gemini_request(request);

        tracing::debug!(
            model = %self.config.model,
            contents = body.contents.len(),
            "Gemini API request"
        );

        self.client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e.without_url()))
                } else {
                    AIError::network(e.without_url().to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(error_from_status(status.as_u16(), &error_body))
    }

    /// Parses a successful response.
    async fn parse_response(&self, response: Response) -> Result<ChatResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        into_chat_response(body, &self.config.model)
    }

    /// One attempt: send and parse.
    async fn attempt(&self, request: &ChatRequest) -> Result<ChatResponse, AIError> {
        let response = self.send_request(request).await?;
        self.parse_response(response).await
    }
}

#[async_trait]
impl AIProvider for GeminiProvider {
    async fn send_message(&self, request: ChatRequest) -> Result<ChatResponse, AIError> {
        let mut retry_count = 0;

        loop {
            let err = match self.attempt(&request).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            let delay = match retry_delay(&err, retry_count) {
                Some(delay) if retry_count < self.config.max_retries => delay,
                _ => return Err(err),
            };

            tracing::warn!(
                attempt = retry_count + 1,
                delay_secs = delay.as_secs(),
                error = %err,
                "Gemini request failed, retrying"
            );
            sleep(delay).await;
            retry_count += 1;
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

/// Wait before retrying `err`, or `None` when it should surface now.
///
/// A 429 waits for the provider's hint when it is short enough. A timed-out
/// attempt is not retried since the request deadline would cut the retry
/// short. Other transient failures back off 1s, 2s, 4s, ...
fn retry_delay(err: &AIError, retry_count: u32) -> Option<Duration> {
    match err {
        AIError::RateLimited { retry_after_secs } if *retry_after_secs <= MAX_RETRY_AFTER_SECS => {
            Some(Duration::from_secs(u64::from(*retry_after_secs)))
        }
        AIError::RateLimited { .. } | AIError::Timeout { .. } => None,
        err if err.is_retryable() => Some(Duration::from_secs(1 << retry_count.min(5))),
        _ => None,
    }
}

/// Maps a non-success HTTP status to an error.
///
/// Only the provider's `error.message` is kept; the raw body is dropped.
fn error_from_status(status: u16, body: &str) -> AIError {
    let error = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error);
    let message = error
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| format!("HTTP {}", status));

    match status {
        400 if message.contains("API key") => AIError::AuthenticationFailed,
        400 => AIError::InvalidRequest(message),
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(
            error
                .as_ref()
                .and_then(GeminiErrorBody::retry_after_secs)
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        ),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, message)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, message)),
    }
}

/// Extracts reply text, usage, and finish reason.
fn into_chat_response(body: GenerateContentResponse, model: &str) -> Result<ChatResponse, AIError> {
    let Some(candidate) = body.candidates.into_iter().next() else {
        return match body.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(AIError::content_filtered(reason)),
            None => Err(AIError::parse("no candidates in response")),
        };
    };

    let finish_reason = map_finish_reason(candidate.finish_reason.as_deref());
    let content: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if content.is_empty() && finish_reason == FinishReason::ContentFilter {
        return Err(AIError::content_filtered(
            candidate.finish_reason.unwrap_or_else(|| "SAFETY".to_string()),
        ));
    }

    let usage = body
        .usage_metadata
        .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count))
        .unwrap_or_default();

    Ok(ChatResponse {
        content,
        usage,
        model: body.model_version.unwrap_or_else(|| model.to_string()),
        finish_reason,
    })
}

fn map_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        None | Some("STOP") => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::Length,
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT")
        | Some("SPII") => FinishReason::ContentFilter,
        Some(_) => FinishReason::Other,
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn text(role: MessageRole, text: &str) -> Self {
        Self {
            role: Some(role.as_str().to_string()),
            parts: vec![GeminiPart {
                text: Some(text.to_string()),
            }],
        }
    }

    fn from_message(message: &Message) -> Self {
        Self::text(message.role, &message.content)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: Option<String>,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

impl GeminiErrorBody {
    /// Reads `retryDelay` (e.g. `"34s"`) from a RetryInfo detail.
    fn retry_after_secs(&self) -> Option<u32> {
        self.details
            .iter()
            .filter_map(|d| d.get("retryDelay").and_then(|v| v.as_str()))
            .find_map(|delay| delay.trim_end_matches('s').parse::<f64>().ok())
            .map(|secs| secs.ceil() as u32)
    }
}
