//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Invalid request timeout (must be 1-300 seconds)")]
    InvalidTimeout,

    #[error("Invalid AI provider timeout")]
    InvalidAiTimeout,

    #[error("Invalid AI base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("AI provider timeout ({provider_secs}s) must be shorter than the request timeout ({request_secs}s)")]
    ProviderTimeoutNotShorter {
        provider_secs: u64,
        request_secs: u64,
    },
}
