//! Roster Web Server
//!
//! Binds the listener and serves the application until Ctrl-C.

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use roster_core::RosterConfig;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Main Roster web server
pub struct RosterServer {
    state: AppState,
}

impl RosterServer {
    /// Connect to the database and directory described by `config`
    pub async fn new(config: RosterConfig) -> WebResult<Self> {
        let state = AppState::new(config).await?;
        Ok(Self::from_state(state))
    }

    /// Wrap state that has already been assembled
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Bind the configured address and serve
    pub async fn start(self) -> WebResult<()> {
        let address = self.state.config.address();

        info!("🚀 Starting Roster Web Server");
        info!("📍 Server address: http://{}", address);

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> WebResult<()> {
        if let Ok(addr) = listener.local_addr() {
            info!("✅ Server listening on http://{}", addr);
        }

        let app = create_app(self.state);

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("❌ Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &RosterConfig {
        &self.state.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Builder for RosterServer
pub struct RosterServerBuilder {
    config: RosterConfig,
}

impl RosterServerBuilder {
    pub fn new(config: RosterConfig) -> Self {
        Self { config }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set database URL
    pub fn database_url<S: Into<String>>(mut self, database_url: S) -> Self {
        self.config.database.url = database_url.into();
        self
    }

    /// Set where uploaded files are written
    pub fn upload_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.uploads.dir = dir.into();
        self
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Validate the configuration and build the server
    pub async fn build(self) -> WebResult<RosterServer> {
        self.config
            .validate()
            .map_err(|e| WebError::Config(e.to_string()))?;
        RosterServer::new(self.config).await
    }
}

impl Default for RosterServerBuilder {
    fn default() -> Self {
        Self::new(RosterConfig::default())
    }
}
