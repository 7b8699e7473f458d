//! Liveness endpoint.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::error::not_found;

/// Liveness text returned by `GET /hello`.
pub const HELLO_MESSAGE: &str = "Server is running";

#[derive(Debug, Clone, Serialize)]
pub struct HelloResponse {
    pub data: String,
}

/// GET /api/v1/hello - Liveness check.
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        data: HELLO_MESSAGE.to_string(),
    })
}

/// Creates the liveness route; works under any router state.
pub fn hello_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/hello", get(hello).fallback(not_found))
}
