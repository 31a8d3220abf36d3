use std::sync::Arc;

use tokio::net::TcpListener;

use artifex_registry::ArtifactRegistry;
use artifex_store::FsKeyStore;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;

/// The Artifex registry server.
///
/// Owns the registry's lifecycle: the store is constructed here from the
/// configuration and handed to handlers as a shared state handle.
pub struct ArtifexServer {
    config: ServerConfig,
    registry: Arc<ArtifactRegistry>,
}

impl ArtifexServer {
    /// Build a server from configuration. A configured `data_dir` opens a
    /// filesystem store there; otherwise the registry is in-memory.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let registry = match &config.data_dir {
            Some(dir) => {
                let store = FsKeyStore::open(dir).map_err(artifex_registry::RegistryError::from)?;
                ArtifactRegistry::new(Arc::new(store))
            }
            None => ArtifactRegistry::in_memory(),
        };
        Ok(Self {
            config,
            registry: Arc::new(registry),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The registry this server fronts.
    pub fn registry(&self) -> &Arc<ArtifactRegistry> {
        &self.registry
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.registry), &self.config)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("artifex server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| crate::error::ServerError::Internal(e.to_string()))
    }
}
