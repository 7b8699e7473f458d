//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## AI Ports
//!
//! - `AIProvider` - The external chat model that advances a conversation

mod ai_provider;

pub use ai_provider::{
    AIError, AIProvider, ChatRequest, ChatResponse, FinishReason, ProviderInfo, TokenUsage,
};
