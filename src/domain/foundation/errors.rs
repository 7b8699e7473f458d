//! Error types for the domain layer.

use std::error::Error;
use std::fmt;

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // External call errors
    InvalidInput,
    AIProviderError,

    // Routing errors
    NotFound,
    RequestTimeout,

    // Infrastructure errors
    InternalError,
}

impl ErrorCode {
    /// HTTP status code this category maps to by default.
    pub fn default_status(&self) -> u16 {
        match self {
            ErrorCode::ValidationFailed | ErrorCode::InvalidInput => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::RequestTimeout => 408,
            ErrorCode::AIProviderError | ErrorCode::InternalError => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::AIProviderError => "AI_PROVIDER_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::RequestTimeout => "REQUEST_TIMEOUT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Normalized error carrying the HTTP status it should be reported with.
///
/// `cause` holds the underlying failure text for diagnostics only. It is
/// never rendered to callers unless diagnostics are enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub code: ErrorCode,
    pub status_code: u16,
    pub message: String,
    pub cause: Option<String>,
}

impl ClassifiedError {
    /// Creates a classified error with the code's default status.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status_code: code.default_status(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a classified error with an explicit status code.
    pub fn with_status(code: ErrorCode, status_code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            status_code,
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a 400 validation error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Creates a 404 error for an unmatched path.
    pub fn not_found(path: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Not found: {}", path))
    }

    /// Creates a 408 for a request that outlived the server deadline.
    pub fn request_timeout() -> Self {
        Self::new(ErrorCode::RequestTimeout, "Request timed out")
    }

    /// Creates a generic 500 error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Attaches the underlying cause for diagnostic output.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for ClassifiedError {}
