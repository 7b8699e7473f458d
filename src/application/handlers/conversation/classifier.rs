//! Error classification - maps any failure in the relay to a `ClassifiedError`.
//!
//! Rules, in order:
//!
//! 1. Already-classified errors and prompt validation failures keep their status.
//! 2. Provider rejections (`AIError::InvalidRequest`) whose own message
//!    carries an "invalid input" signature → 400.
//! 3. Everything else → 500 with a generic message; the cause is kept for
//!    diagnostics only.
//!
//! Classification is total and idempotent.

use crate::domain::conversation::PromptError;
use crate::domain::foundation::{ClassifiedError, ErrorCode};
use crate::ports::AIError;

use super::session::ExternalCallError;

/// Message returned when the provider rejects the prompt.
pub const INVALID_INPUT_MESSAGE: &str = "The model rejected the request as invalid input";

/// Message returned for provider failures.
pub const PROVIDER_FAILURE_MESSAGE: &str = "An error occurred while generating the AI response";

/// Message returned for anything unrecognised.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Any failure that can reach the pipeline boundary.
#[derive(Debug, Clone)]
pub enum RelayError {
    /// Inbound prompt rejected before reaching the session.
    Validation(PromptError),
    /// The model call failed.
    ExternalCall(ExternalCallError),
    /// Already classified; passes through unchanged.
    Classified(ClassifiedError),
    /// Unexpected failure (formatting, serialization, ...).
    Internal(String),
}

impl From<PromptError> for RelayError {
    fn from(err: PromptError) -> Self {
        RelayError::Validation(err)
    }
}

impl From<ExternalCallError> for RelayError {
    fn from(err: ExternalCallError) -> Self {
        RelayError::ExternalCall(err)
    }
}

impl From<ClassifiedError> for RelayError {
    fn from(err: ClassifiedError) -> Self {
        RelayError::Classified(err)
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Internal(err.to_string())
    }
}

/// Sub-category of a failed model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalCallKind {
    /// The provider judged the input invalid.
    InvalidInput,
    /// Any other provider failure.
    ProviderFailure,
}

impl ExternalCallKind {
    /// Categorizes a provider error.
    ///
    /// Only the provider's own rejection text is inspected. Every other
    /// variant is a server-side failure whatever its wording.
    pub fn of(err: &AIError) -> Self {
        match err {
            AIError::InvalidRequest(message) if has_invalid_input_signature(message) => {
                ExternalCallKind::InvalidInput
            }
            _ => ExternalCallKind::ProviderFailure,
        }
    }
}

/// Returns true if a provider message reads as an invalid-input rejection.
pub fn has_invalid_input_signature(message: &str) -> bool {
    message.to_ascii_lowercase().contains("invalid")
}

/// Maps a failure to its classified form.
pub fn classify(error: impl Into<RelayError>) -> ClassifiedError {
    match error.into() {
        RelayError::Classified(classified) => classified,
        RelayError::Validation(err) => ClassifiedError::bad_request(err.to_string()),
        RelayError::ExternalCall(err) => match ExternalCallKind::of(&err.source) {
            ExternalCallKind::InvalidInput => {
                ClassifiedError::new(ErrorCode::InvalidInput, INVALID_INPUT_MESSAGE)
                    .with_cause(err.source.to_string())
            }
            ExternalCallKind::ProviderFailure => {
                ClassifiedError::new(ErrorCode::AIProviderError, PROVIDER_FAILURE_MESSAGE)
                    .with_cause(err.source.to_string())
            }
        },
        RelayError::Internal(cause) => {
            ClassifiedError::internal(INTERNAL_ERROR_MESSAGE).with_cause(cause)
        }
    }
}
