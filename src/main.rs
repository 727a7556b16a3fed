//! Rax Drive Proxy - Entry Point
//!
//! An HTTP gateway that lists and streams Google Drive files while hiding
//! the raw Drive identifiers behind encrypted tokens.

use log::{error, info};

use rax_drive_proxy::Server;
use rax_drive_proxy::config::ProxyConfig;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching drive proxy...");

    let config = match ProxyConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
