//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `GeminiProvider` - Google Gemini models via `generateContent`

mod gemini_provider;
mod mock_provider;

pub use gemini_provider::{GeminiConfig, GeminiProvider, GEMINI_API_BASE, GEMINI_DEFAULT_MODEL};
pub use mock_provider::MockAIProvider;
