//! Conversation module - prompts, messages, and transcripts.
//!
//! Pure value types for a single-session chat. The session that mutates a
//! transcript lives in the application layer because it calls the model
//! provider port.

mod generation;
mod message;
mod prompt;

pub use generation::GenerationConfig;
pub use message::{Message, MessageRole, Transcript};
pub use prompt::{validate_prompt, Prompt, PromptError, MAX_PROMPT_CHARS, PROMPT_FIELD};
