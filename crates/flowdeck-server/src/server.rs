//! HTTP server for the launcher UI assets.

use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Build the router. Every request falls through to the static asset
/// tree; the launcher UI is a single page plus its scripts and styles.
pub fn build_router(static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}

/// Bind and run the server
pub async fn serve(config: ServerConfig) -> ServerResult<()> {
    let app = build_router(&config.static_dir);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .map_err(|e| ServerError::ConfigError(format!("Invalid bind address: {}", e)))?;

    let listener = TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    info!("Serving launcher assets from {}", config.static_dir);
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
