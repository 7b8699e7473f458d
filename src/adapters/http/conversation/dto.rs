//! HTTP DTOs for conversation endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::Serialize;

use crate::application::handlers::conversation::{
    GenerateResponseResult, ResetConversationResult,
};
use crate::domain::conversation::{Message, MessageRole};

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A transcript message as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub role: MessageRole,
    pub content: String,
}

impl From<Message> for MessageView {
    fn from(message: Message) -> Self {
        Self {
            role: message.role,
            content: message.content,
        }
    }
}

/// Conversation state after an exchange.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    /// The reply that was just produced.
    pub current_message: MessageView,
    /// Whole transcript, oldest first.
    pub history: Vec<MessageView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponseData {
    /// Reply text.
    pub message: String,
    pub conversation: ConversationView,
}

/// Success envelope for `POST /generate_response`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponseBody {
    pub success: bool,
    pub data: GenerateResponseData,
}

impl From<GenerateResponseResult> for GenerateResponseBody {
    fn from(result: GenerateResponseResult) -> Self {
        Self {
            success: true,
            data: GenerateResponseData {
                message: result.message,
                conversation: ConversationView {
                    current_message: result.current_message.into(),
                    history: result.history.into_iter().map(MessageView::from).collect(),
                },
            },
        }
    }
}

/// Success envelope for `POST /generate_response/reset`.
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

impl From<ResetConversationResult> for ResetResponse {
    fn from(result: ResetConversationResult) -> Self {
        Self {
            success: true,
            message: result.message,
        }
    }
}
