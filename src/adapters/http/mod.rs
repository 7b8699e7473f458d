//! HTTP adapters - REST API implementations.
//!
//! All endpoints live under `/api/v1`. Anything else, including a wrong
//! method on a known path, falls through to a JSON 404.

pub mod conversation;
pub mod error;
pub mod hello;
pub mod middleware;

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use conversation::{conversation_routes, ConversationAppState};
pub use error::{handle_layer_error, not_found, ApiError, ErrorResponse};
pub use hello::hello_routes;

/// Path prefix for every API route.
pub const API_PREFIX: &str = "/api/v1";

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Server-level HTTP behaviour.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Requests taking longer than this get a 408.
    pub request_timeout: Duration,
    /// Allowed CORS origins; empty allows any.
    pub cors_origins: Vec<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

/// Builds the complete application router.
pub fn app_router(state: ConversationAppState, options: &HttpOptions) -> Router {
    let api = conversation_routes().merge(hello_routes());

    let router = Router::new()
        .nest(API_PREFIX, api)
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_layer_error))
                .layer(TimeoutLayer::new(options.request_timeout)),
        );

    middleware::with_security_headers(router)
        .layer(middleware::cors_layer(&options.cors_origins))
        .layer(TraceLayer::new_for_http())
}
