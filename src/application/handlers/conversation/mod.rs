//! Conversation command handlers.
//!
//! Owns the single conversation session, validates and relays prompts to it,
//! and classifies every failure into a stable HTTP error taxonomy.

mod classifier;
mod generate_response;
mod reset_conversation;
mod session;

pub use classifier::{
    classify, has_invalid_input_signature, ExternalCallKind, RelayError,
    INTERNAL_ERROR_MESSAGE, INVALID_INPUT_MESSAGE, PROVIDER_FAILURE_MESSAGE,
};

pub use generate_response::{
    // Command
    GenerateResponseCommand,
    GenerateResponseHandler,
    GenerateResponseResult,
    // Types
    PipelineStage,
};

pub use reset_conversation::{
    ResetConversationHandler, ResetConversationResult, RESET_CONFIRMATION,
};

pub use session::{ConversationSession, Exchange, ExternalCallError};
