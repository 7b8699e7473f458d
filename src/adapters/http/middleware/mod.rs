//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `security` - CORS policy and security response headers

pub mod security;

pub use security::{cors_layer, with_security_headers};
