//! webtty-gateway server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket relay and static assets.

use tracing_subscriber::EnvFilter;

use webtty_gateway::api;
use webtty_gateway::config::{LogFormat, RelayConfig};
use webtty_gateway::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = RelayConfig::from_env()?;

    // Initialize tracing
    init_tracing(config.log_format);
    tracing::info!(
        addr = %config.listen_addr,
        ws_path = %config.ws_path,
        static_dir = %config.static_dir.display(),
        allow_any_origin = config.allow_any_origin,
        "starting webtty-gateway"
    );

    // Build router
    let app = api::build_router(&config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    server::run(listener, app, server::shutdown_signal()).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
