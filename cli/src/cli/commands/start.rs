use std::path::PathBuf;

use detector_proxy_core::config::load_config;
use detector_proxy_core::proxy::ProxyServer;

pub async fn run(
    config_path: Option<PathBuf>,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> anyhow::Result<()> {
    // Load configuration
    let mut config = load_config(config_path)?;

    // Apply overrides if provided
    if let Some(host) = host_override {
        config.server.host = host;
    }
    if let Some(port) = port_override {
        config.server.port = port;
    }

    tracing::info!("Starting Detector Proxy...");
    tracing::info!("  Port: {}", config.server.port);
    tracing::info!("  Host: {}", config.server.host);
    tracing::info!("  Icons backend: {}", config.backends.icons_url);
    tracing::info!("  Detection backend: {}", config.backends.detect_url);
    tracing::info!(
        "  Upstream timeouts: connect {}s, request {}s",
        config.timeouts.connect_timeout,
        config.timeouts.request_timeout
    );

    // Validates before binding
    let server = ProxyServer::new(&config)?;

    tracing::info!("Proxy server starting on http://{}:{}", config.server.host, config.server.port);
    tracing::info!("Press Ctrl+C to stop");

    // Run server (blocks until shutdown)
    server.run().await?;

    Ok(())
}
