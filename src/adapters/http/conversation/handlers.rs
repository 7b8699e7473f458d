//! HTTP handlers for conversation endpoints.
//!
//! These handlers connect Axum routes to application layer operations.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

use crate::adapters::http::error::ApiError;
use crate::application::handlers::conversation::{
    classify, ConversationSession, GenerateResponseCommand, GenerateResponseHandler,
    ResetConversationHandler,
};
use crate::domain::conversation::PromptError;
use crate::domain::foundation::{ClassifiedError, ErrorCode};

use super::dto::{GenerateResponseBody, ResetResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for conversation handlers.
#[derive(Clone)]
pub struct ConversationAppState {
    pub session: Arc<ConversationSession>,
    /// Include classified causes in error bodies.
    pub expose_error_details: bool,
}

impl ConversationAppState {
    /// Creates a new ConversationAppState with error details hidden.
    pub fn new(session: Arc<ConversationSession>) -> Self {
        Self {
            session,
            expose_error_details: false,
        }
    }

    /// Sets whether error bodies carry diagnostic causes.
    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }

    pub fn generate_handler(&self) -> GenerateResponseHandler {
        GenerateResponseHandler::new(self.session.clone())
    }

    pub fn reset_handler(&self) -> ResetConversationHandler {
        ResetConversationHandler::new(self.session.clone())
    }

    fn api_error(&self, error: ClassifiedError) -> ApiError {
        ApiError::new(error, self.expose_error_details)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/v1/generate_response
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/generate_response - Send a prompt and get the model's reply.
///
/// # Errors
/// - 400 Bad Request: prompt missing, not a string, empty, too long, body not JSON,
///   or the model rejected the input
/// - 500 Internal Server Error: the model call failed
pub async fn generate_response(
    State(state): State<ConversationAppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload_from(body).map_err(|e| state.api_error(e))?;

    let result = state
        .generate_handler()
        .handle(GenerateResponseCommand::new(payload))
        .await
        .map_err(|e| state.api_error(e))?;

    Ok((StatusCode::OK, Json(GenerateResponseBody::from(result))))
}

/// Turns the body extraction outcome into a payload for validation.
///
/// A body sent without a JSON content type carries no `prompt` field.
fn payload_from(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ClassifiedError> {
    match body {
        Ok(Json(payload)) => Ok(payload),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Null),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ClassifiedError::with_status(
                ErrorCode::ValidationFailed,
                StatusCode::PAYLOAD_TOO_LARGE.as_u16(),
                "Request body is too large",
            ))
        }
        Err(rejection) => Err(classify(PromptError::MalformedBody(rejection.body_text()))),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/v1/generate_response/reset
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/generate_response/reset - Discard the conversation.
pub async fn reset_conversation(
    State(state): State<ConversationAppState>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .reset_handler()
        .handle()
        .await
        .map_err(|e| state.api_error(e))?;

    Ok((StatusCode::OK, Json(ResetResponse::from(result))))
}
