//! Proxy Server - Axum HTTP server

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{BackendsConfig, Config};
use crate::models::EndpointResolver;
use crate::proxy::handlers;
use crate::proxy::upstream::UpstreamClient;

/// Application state shared across handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub resolver: Arc<EndpointResolver>,
    pub backends: Arc<BackendsConfig>,
    pub max_body_bytes: usize,
}

impl AppState {
    /// Validate `config` and build the state every handler reads from.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let resolver = config.validate()?;
        let upstream = UpstreamClient::new(&config.timeouts)?;

        Ok(Self {
            upstream: Arc::new(upstream),
            resolver: Arc::new(resolver),
            backends: Arc::new(config.trimmed_backends()),
            max_body_bytes: config.server.max_body_bytes,
        })
    }
}

/// Build the router with every route and layer.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_body_bytes = state.max_body_bytes;

    Router::new()
        // Health check
        .route("/healthz", get(health_check_handler))
        .route("/health", get(health_check_handler))

        // Backend proxies
        .route("/api/icons", get(handlers::icons::handle_list_icons))
        .route("/api/scan", post(handlers::scan::handle_scan))

        // Model endpoint lookup
        .route("/api/models", get(handlers::models::handle_list_models))
        .route("/api/models/:model/endpoints", get(handlers::models::handle_model_endpoints))

        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Proxy server instance
pub struct ProxyServer {
    host: String,
    port: u16,
    state: AppState,
}

impl ProxyServer {
    /// Fails before binding if the configuration is incomplete.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let state = AppState::from_config(config)?;

        Ok(Self {
            host: config.server.host.clone(),
            port: config.server.port,
            state,
        })
    }

    /// Run the proxy server (blocking)
    pub async fn run(self) -> anyhow::Result<()> {
        let app = create_app(self.state);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("Proxy server listening on {}", addr);

        // Handle graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Proxy server stopped");
        Ok(())
    }
}

/// Health check handler
async fn health_check_handler() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
