//! Axum routes for conversation endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{generate_response, reset_conversation, ConversationAppState};
use crate::adapters::http::error::not_found;

/// Creates routes for conversation endpoints.
///
/// - POST /generate_response - Send a prompt, get the reply and history
/// - POST /generate_response/reset - Discard the conversation
///
/// Other methods on these paths get the JSON 404.
pub fn conversation_routes() -> Router<ConversationAppState> {
    Router::new()
        .route(
            "/generate_response",
            post(generate_response).fallback(not_found),
        )
        .route(
            "/generate_response/reset",
            post(reset_conversation).fallback(not_found),
        )
}
