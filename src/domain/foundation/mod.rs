//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers and error types that form the vocabulary of the
//! relay domain.

mod errors;
mod ids;

pub use errors::{ClassifiedError, ErrorCode};
pub use ids::SessionId;
