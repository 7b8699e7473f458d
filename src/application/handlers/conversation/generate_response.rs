//! GenerateResponse command handler.
//!
//! Runs one request through the pipeline:
//!
//! ```text
//! Received ──validate──▶ Validated ──advance──▶ Advanced ──shape──▶ Responded
//!     │                      │
//!     └──▶ Rejected          └──▶ Failed
//! ```
//!
//! Only the `Validated → Advanced` edge touches the session.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::conversation::{validate_prompt, Message};
use crate::domain::foundation::{ClassifiedError, SessionId};

use super::classifier::classify;
use super::session::ConversationSession;

/// Command carrying the raw request payload.
#[derive(Debug, Clone)]
pub struct GenerateResponseCommand {
    pub payload: Value,
}

impl GenerateResponseCommand {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }
}

/// Successful outcome of the pipeline.
#[derive(Debug, Clone)]
pub struct GenerateResponseResult {
    /// Session that handled the request.
    pub session_id: SessionId,
    /// The model's reply.
    pub message: String,
    /// The reply as a transcript message.
    pub current_message: Message,
    /// Transcript after this exchange.
    pub history: Vec<Message>,
}

/// Pipeline stage, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Validated,
    Advanced,
    Responded,
    Rejected,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Validated => "validated",
            PipelineStage::Advanced => "advanced",
            PipelineStage::Responded => "responded",
            PipelineStage::Rejected => "rejected",
            PipelineStage::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler for GenerateResponse commands.
pub struct GenerateResponseHandler {
    session: Arc<ConversationSession>,
}

impl GenerateResponseHandler {
    /// Creates a new handler bound to a session.
    pub fn new(session: Arc<ConversationSession>) -> Self {
        Self { session }
    }

    /// Handles a generate response command.
    ///
    /// Every failure comes back already classified.
    pub async fn handle(
        &self,
        cmd: GenerateResponseCommand,
    ) -> Result<GenerateResponseResult, ClassifiedError> {
        let mut stage = PipelineStage::Received;

        let prompt = match validate_prompt(&cmd.payload) {
            Ok(prompt) => prompt,
            Err(err) => {
                let classified = classify(err);
                tracing::debug!(
                    from = %stage,
                    stage = %PipelineStage::Rejected,
                    status = classified.status_code,
                    "Prompt rejected"
                );
                return Err(classified);
            }
        };
        stage = PipelineStage::Validated;

        let exchange = match self.session.advance(&prompt).await {
            Ok(exchange) => exchange,
            Err(err) => {
                let session_id = err.session_id;
                let classified = classify(err);
                tracing::debug!(
                    session_id = %session_id,
                    from = %stage,
                    stage = %PipelineStage::Failed,
                    status = classified.status_code,
                    "Exchange failed"
                );
                return Err(classified);
            }
        };
        stage = PipelineStage::Advanced;

        let result = GenerateResponseResult {
            session_id: exchange.session_id,
            current_message: Message::model(exchange.reply.as_str()),
            message: exchange.reply,
            history: exchange.history,
        };

        tracing::debug!(
            session_id = %result.session_id,
            from = %stage,
            stage = %PipelineStage::Responded,
            history_len = result.history.len(),
            "Exchange completed"
        );

        Ok(result)
    }
}
