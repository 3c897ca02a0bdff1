//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.
//!
//! The storage backend is built once by the caller and injected here; every
//! handler shares it read-only through the router state.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::HttpServerConfig;
use super::observability_routes::health_routes;
use super::storage_routes::{storage_routes, StorageState};
use crate::file_storage::StorageBackend;

/// HTTP server for the blobdeck front-end
pub struct HttpServer {
    config: HttpServerConfig,
    container: String,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_config(HttpServerConfig::default(), backend)
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: HttpServerConfig, backend: Arc<dyn StorageBackend>) -> Self {
        let container = backend.container().to_string();
        let router = Self::build_router(&config, backend);
        Self {
            config,
            container,
            router,
        }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, backend: Arc<dyn StorageBackend>) -> Router {
        let storage_state = Arc::new(StorageState::new(backend));

        Router::new()
            .merge(health_routes())
            .merge(storage_routes(storage_state))
            .layer(DefaultBodyLimit::max(config.max_upload_bytes))
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server, serving until Ctrl+C
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{}", e)))?;

        let listener = TcpListener::bind(addr).await?;

        info!(
            addr = %listener.local_addr()?,
            container = %self.container,
            max_upload_bytes = self.config.max_upload_bytes,
            "blobdeck listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("blobdeck stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
