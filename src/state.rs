//! Shared state for the query service.

use crate::config::ServerConfig;
use crate::graph::load_turtle;
use anyhow::Result;
use oxigraph::store::Store;
use std::sync::Arc;

/// Application state: the immutable in-memory graph plus the resolved config.
///
/// The [`Store`] handle is internally synchronized and cheap to clone; every
/// request runs read-only queries against the same graph, so no further
/// locking is needed.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Load the RDF file named by the config into a fresh in-memory store.
    pub fn from_config(config: ServerConfig) -> Result<Self> {
        let store = load_turtle(&config.rdf_file)?;
        Ok(Self {
            store,
            config: Arc::new(config),
        })
    }

    /// Build state from an already-populated store, used by tests.
    pub fn from_store(store: Store, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
