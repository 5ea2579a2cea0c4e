//! Server Implementation
//!
//! Binds the listener and serves the router until Ctrl-C.

use std::future::IntoFuture;
use std::time::Duration;

use crate::core::{Config, Result, ServerState};
use crate::services::build_router;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = build_router(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            environment = %self.config.environment,
            "🍔 CraveBites server listening on {}",
            addr
        );

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let shutdown = async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            let _ = shutdown_tx.send(());
        };

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown);
        let grace = Duration::from_millis(self.config.shutdown_timeout_ms);

        // In-flight requests get `grace` to finish once the signal fires
        tokio::select! {
            result = server.into_future() => result?,
            _ = async {
                let _ = shutdown_rx.await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!("Graceful shutdown timed out after {:?}", grace);
            }
        }

        Ok(())
    }
}
