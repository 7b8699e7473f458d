//! Process wiring: configuration → provider → session → router → listener.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::adapters::ai::{GeminiConfig, GeminiProvider};
use crate::adapters::http::{app_router, ConversationAppState, HttpOptions};
use crate::application::ConversationSession;
use crate::config::{AiConfig, AppConfig, ConfigError, ServerConfig, ValidationError};
use crate::ports::{AIError, AIProvider};

/// Startup failed; the process cannot serve requests.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("model provider could not be initialized: {0}")]
    Provider(#[from] AIError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server terminated: {0}")]
    Serve(std::io::Error),
}

impl From<ValidationError> for InitializationError {
    fn from(err: ValidationError) -> Self {
        InitializationError::Config(ConfigError::ValidationFailed(err))
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `server.log_level`. Production logs are JSON.
pub fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = if server.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Maps AI settings onto the Gemini adapter's configuration.
pub fn gemini_config(ai: &AiConfig) -> GeminiConfig {
    GeminiConfig::new(ai.gemini_api_key.clone())
        .with_model(ai.model.clone())
        .with_base_url(ai.base_url.clone())
        .with_timeout(ai.timeout())
        .with_max_retries(ai.max_retries)
}

/// Creates the session, failing if the provider cannot be constructed.
pub fn build_session(config: &AppConfig) -> Result<Arc<ConversationSession>, InitializationError> {
    let provider = GeminiProvider::new(gemini_config(&config.ai))?;
    Ok(Arc::new(ConversationSession::new(Arc::new(provider))))
}

/// Builds the router around an already-constructed provider.
pub fn build_app_with_provider(provider: Arc<dyn AIProvider>, server: &ServerConfig) -> Router {
    let session = Arc::new(ConversationSession::new(provider));
    router_for(session, server)
}

/// Builds the router from configuration.
pub fn build_app(config: &AppConfig) -> Result<Router, InitializationError> {
    let session = build_session(config)?;
    Ok(router_for(session, &config.server))
}

fn router_for(session: Arc<ConversationSession>, server: &ServerConfig) -> Router {
    let state =
        ConversationAppState::new(session).with_error_details(server.expose_error_details());
    let options = HttpOptions {
        request_timeout: server.request_timeout(),
        cors_origins: server.cors_origins_list(),
    };
    app_router(state, &options)
}

/// Validates configuration, binds, and serves until Ctrl-C.
pub async fn serve(config: AppConfig) -> Result<(), InitializationError> {
    config.validate()?;
    let addr = config.server.socket_addr()?;
    let app = build_app(&config)?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| InitializationError::Bind { addr, source })?;

    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        model = %config.ai.model,
        "Chat relay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InitializationError::Serve)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
