//! Prompt value object and request-body validation.

use serde_json::Value;
use thiserror::Error;

/// Maximum prompt length in characters.
pub const MAX_PROMPT_CHARS: usize = 4000;

/// Name of the request field carrying the prompt.
pub const PROMPT_FIELD: &str = "prompt";

/// Reasons an inbound prompt is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("'prompt' field is required")]
    MissingField,

    #[error("'prompt' field must be a string")]
    WrongType,

    #[error("'prompt' field cannot be empty")]
    Empty,

    #[error("'prompt' field cannot be longer than {max} characters")]
    TooLong { max: usize, actual: usize },

    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(String),
}

/// A validated user prompt.
///
/// # Invariants
///
/// - Contains at least one non-whitespace character
/// - At most [`MAX_PROMPT_CHARS`] characters
/// - Holds the submitted text verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// Validates raw text as a prompt.
    pub fn new(text: impl Into<String>) -> Result<Self, PromptError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(PromptError::Empty);
        }
        let actual = text.chars().count();
        if actual > MAX_PROMPT_CHARS {
            return Err(PromptError::TooLong {
                max: MAX_PROMPT_CHARS,
                actual,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts and validates the prompt from an arbitrary JSON payload.
///
/// Checks run in order: presence, type, emptiness, length. Non-string falsy
/// values (`null`, `false`, `0`) count as missing; the empty string is
/// reported as [`PromptError::Empty`].
pub fn validate_prompt(payload: &Value) -> Result<Prompt, PromptError> {
    let field = payload.get(PROMPT_FIELD).unwrap_or(&Value::Null);

    if is_falsy(field) && !field.is_string() {
        return Err(PromptError::MissingField);
    }

    match field {
        Value::String(text) => Prompt::new(text.as_str()),
        _ => Err(PromptError::WrongType),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
