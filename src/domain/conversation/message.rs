//! Message entity and transcript for conversations.
//!
//! Messages are immutable records of user/model exchanges. The transcript is
//! the ordered dialogue owned by a single conversation session.

use serde::{Deserialize, Serialize};

/// Role of a message sender in a conversation.
///
/// Serialized with the model provider's vocabulary (`"user"` / `"model"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User input.
    User,
    /// Model reply.
    Model,
}

impl MessageRole {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Model => "model",
        }
    }
}

/// An immutable message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates a model message.
    pub fn model(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Model, content)
    }
}

/// Ordered dialogue history.
///
/// # Invariants
///
/// - Grows only by whole exchanges (user message followed by model message)
/// - Insertion order is dialogue order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one complete exchange.
    pub fn push_exchange(&mut self, prompt: impl Into<String>, reply: impl Into<String>) {
        self.messages.push(Message::user(prompt));
        self.messages.push(Message::model(reply));
    }

    /// Messages in dialogue order.
    /// Owned copy of the messages, detached from this transcript.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
