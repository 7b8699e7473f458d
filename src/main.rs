//! Chat relay server binary.

use chat_relay::bootstrap::{self, InitializationError};
use chat_relay::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            bootstrap::init_tracing(&ServerConfig::default());
            fail(err.into());
        }
    };

    bootstrap::init_tracing(&config.server);

    if let Err(err) = bootstrap::serve(config).await {
        fail(err);
    }
}

fn fail(err: InitializationError) -> ! {
    tracing::error!(error = %err, "Chat relay failed to start");
    std::process::exit(1);
}
