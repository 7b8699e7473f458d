//! HTTP error response shaping.
//!
//! Every failure leaving the API is a [`ClassifiedError`] rendered as
//! `{success: false, message, error?}`. That includes unmatched routes,
//! wrong methods on known paths and middleware failures such as timeouts.

use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{BoxError, Json};
use serde::Serialize;
use tower::timeout::error::Elapsed;

use crate::domain::foundation::ClassifiedError;

/// Error envelope returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Diagnostic cause, present only when error details are exposed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// Builds the envelope, attaching the cause only when `expose_details` is set.
    pub fn from_classified(error: &ClassifiedError, expose_details: bool) -> Self {
        Self {
            success: false,
            message: error.message.clone(),
            error: if expose_details {
                error.cause.clone()
            } else {
                None
            },
        }
    }
}

/// A classified error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    error: ClassifiedError,
    expose_details: bool,
}

impl ApiError {
    pub fn new(error: ClassifiedError, expose_details: bool) -> Self {
        Self {
            error,
            expose_details,
        }
    }

    fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                code = %self.error.code,
                cause = self.error.cause.as_deref().unwrap_or(""),
                "Request failed: {}",
                self.error.message
            );
        } else {
            tracing::warn!(
                status = status.as_u16(),
                code = %self.error.code,
                "Request rejected: {}",
                self.error.message
            );
        }

        let body = ErrorResponse::from_classified(&self.error, self.expose_details);
        (status, Json(body)).into_response()
    }
}

/// Fallback for unmatched paths and for unsupported methods on known paths.
///
/// Reads `OriginalUri` so nested routes report the full request path.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::new(ClassifiedError::not_found(uri.path()), false)
}

/// Converts errors raised by the service stack into the error envelope.
pub async fn handle_layer_error(err: BoxError) -> ApiError {
    let error = if err.is::<Elapsed>() {
        ClassifiedError::request_timeout()
    } else {
        ClassifiedError::internal("An unexpected error occurred").with_cause(err.to_string())
    };
    ApiError::new(error, false)
}
