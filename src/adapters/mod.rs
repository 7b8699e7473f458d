//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Model providers (Gemini, mock)
//! - `http` - axum REST API

pub mod ai;
pub mod http;
