//! Scripted model provider for tests and offline runs.
//!
//! Replies are taken from a script in order. Once the script runs out the
//! provider echoes the prompt back, so a bare `MockAIProvider::new()` always
//! answers. Every request is recorded, including the history and generation
//! settings it carried.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{
    AIError, AIProvider, ChatRequest, ChatResponse, FinishReason, ProviderInfo, TokenUsage,
};

const MOCK_MODEL: &str = "mock-model";

/// Provider double whose clones share one script and one request log.
#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    script: Arc<Mutex<VecDeque<Result<String, AIError>>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    latency: Duration,
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.enqueue(Ok(content.into()))
    }

    /// Queues a failure.
    pub fn with_error(self, error: AIError) -> Self {
        self.enqueue(Err(error))
    }

    /// Waits this long before answering each request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of requests that reached the provider.
    pub fn call_count(&self) -> usize {
        guard(&self.requests).len()
    }

    /// Copies of every request received, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        guard(&self.requests).clone()
    }

    fn enqueue(self, entry: Result<String, AIError>) -> Self {
        guard(&self.script).push_back(entry);
        self
    }

    fn next_reply(&self, request: &ChatRequest) -> Result<String, AIError> {
        guard(&self.script)
            .pop_front()
            .unwrap_or_else(|| Ok(format!("Echo: {}", request.prompt)))
    }
}

fn guard<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

fn word_count(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn send_message(&self, request: ChatRequest) -> Result<ChatResponse, AIError> {
        guard(&self.requests).push(request.clone());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let content = self.next_reply(&request)?;
        let prompt_words = request
            .history
            .iter()
            .map(|message| word_count(&message.content))
            .sum::<u32>()
            .saturating_add(word_count(&request.prompt));

        Ok(ChatResponse {
            usage: TokenUsage::new(prompt_words, word_count(&content)),
            content,
            model: MOCK_MODEL.to_string(),
            finish_reason: FinishReason::Stop,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", MOCK_MODEL)
    }
}
