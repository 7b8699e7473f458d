//! Conversation session - the single stateful chat behind the relay.
//!
//! Owns one transcript and the generation settings used to advance it.
//! All mutation goes through an async mutex that is held across the model
//! call, so exchanges are applied one at a time in lock-acquisition order
//! (tokio's mutex is FIFO-fair, so this is arrival order).

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::conversation::{GenerationConfig, Message, Prompt, Transcript};
use crate::domain::foundation::SessionId;
use crate::ports::{AIError, AIProvider, ChatRequest, FinishReason, ProviderInfo, TokenUsage};

/// The model call behind `advance` failed. The transcript is unchanged.
#[derive(Debug, Clone, Error)]
#[error("external model call failed: {source}")]
pub struct ExternalCallError {
    /// Session the call was made for.
    pub session_id: SessionId,
    /// Underlying provider failure.
    pub source: AIError,
}

/// Result of a successful exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Session that produced this exchange.
    pub session_id: SessionId,
    /// The model's reply text.
    pub reply: String,
    /// Full transcript after the exchange, detached from the session.
    pub history: Vec<Message>,
    /// Token usage reported by the provider.
    pub usage: TokenUsage,
}

struct SessionState {
    id: SessionId,
    transcript: Transcript,
    generation: GenerationConfig,
}

impl SessionState {
    fn fresh() -> Self {
        Self {
            id: SessionId::new(),
            transcript: Transcript::new(),
            generation: GenerationConfig::default(),
        }
    }
}

/// A chat transcript bound to one model provider.
///
/// # Invariants
///
/// - The transcript grows only by whole exchanges via [`advance`](Self::advance)
/// - [`reset`](Self::reset) replaces the transcript atomically
/// - A failed or abandoned `advance` appends nothing
pub struct ConversationSession {
    provider: Arc<dyn AIProvider>,
    state: Mutex<SessionState>,
}

impl ConversationSession {
    /// Creates a session with an empty transcript and default settings.
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        let state = SessionState::fresh();
        tracing::info!(
            session_id = %state.id,
            provider = %provider.provider_info().name,
            "Conversation session started"
        );
        Self {
            provider,
            state: Mutex::new(state),
        }
    }

    /// Sends `prompt` to the model and appends the exchange.
    ///
    /// The lock is held until the exchange is appended. If the returned future
    /// is dropped before the provider answers, the transcript is untouched and
    /// the provider's eventual answer is discarded.
    pub async fn advance(&self, prompt: &Prompt) -> Result<Exchange, ExternalCallError> {
        let mut state = self.state.lock().await;
        let session_id = state.id;

        let request = ChatRequest::new(prompt.as_str())
            .with_history(state.transcript.snapshot())
            .with_generation(state.generation);

        tracing::debug!(
            session_id = %session_id,
            history_len = state.transcript.len(),
            "Sending message to model provider"
        );

        let response = self
            .provider
            .send_message(request)
            .await
            .map_err(|source| {
                tracing::warn!(session_id = %session_id, error = %source, "Model call failed");
                ExternalCallError { session_id, source }
            })?;

        if response.finish_reason != FinishReason::Stop {
            tracing::warn!(
                session_id = %session_id,
                finish_reason = ?response.finish_reason,
                "Model reply ended before a natural stop"
            );
        }

        state
            .transcript
            .push_exchange(prompt.as_str(), response.content.as_str());

        tracing::debug!(
            session_id = %session_id,
            history_len = state.transcript.len(),
            total_tokens = response.usage.total_tokens,
            finish_reason = ?response.finish_reason,
            "Exchange appended"
        );

        Ok(Exchange {
            session_id,
            reply: response.content,
            history: state.transcript.snapshot(),
            usage: response.usage,
        })
    }

    /// Discards the transcript and restores default generation settings.
    ///
    /// Waits for any in-flight `advance` to finish first. Returns the id of
    /// the new session.
    pub async fn reset(&self) -> SessionId {
        let mut state = self.state.lock().await;
        let previous = state.id;
        *state = SessionState::fresh();
        tracing::info!(
            previous_session_id = %previous,
            session_id = %state.id,
            "Conversation session reset"
        );
        state.id
    }

    /// Copy of the current transcript.
    pub async fn history(&self) -> Vec<Message> {
        self.state.lock().await.transcript.snapshot()
    }

    /// Number of messages in the transcript.
    pub async fn len(&self) -> usize {
        self.state.lock().await.transcript.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Current session id.
    pub async fn id(&self) -> SessionId {
        self.state.lock().await.id
    }

    /// Information about the provider behind this session.
    pub fn provider_info(&self) -> ProviderInfo {
        self.provider.provider_info()
    }
}

impl std::fmt::Debug for ConversationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSession")
            .field("provider", &self.provider.provider_info().name)
            .finish_non_exhaustive()
    }
}
