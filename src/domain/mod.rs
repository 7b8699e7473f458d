//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, error codes, classified errors)
//! - `conversation` - Prompts, messages, transcripts, and generation settings

pub mod conversation;
pub mod foundation;
