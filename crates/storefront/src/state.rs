//! Application state shared across handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use blockshop_core::{Catalog, CatalogError, CartStore};

use crate::config::StorefrontConfig;
use crate::middleware::SessionMemoryStore;

/// Error loading the catalog at startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: CatalogError,
    },
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Apart from the session store
/// it holds only read-only data: per-visitor carts live in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart_store: CartStore,
    sessions: SessionMemoryStore,
}

impl AppState {
    /// Create application state around an already-built catalog.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart_store: CartStore::new(Arc::new(catalog)),
                sessions: SessionMemoryStore::default(),
            }),
        }
    }

    /// Create application state, loading the catalog named in `config`.
    ///
    /// Falls back to the built-in catalog when no catalog path is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or is invalid.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, CatalogLoadError> {
        let catalog = match &config.catalog_path {
            Some(path) => load_catalog(path)?,
            None => Catalog::builtin(),
        };
        tracing::info!(
            items = catalog.len(),
            currency = catalog.currency().code(),
            "Catalog loaded"
        );
        Ok(Self::new(config, catalog))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the cart store.
    #[must_use]
    pub fn cart_store(&self) -> &CartStore {
        &self.inner.cart_store
    }

    /// Get the session store backing the session layer.
    #[must_use]
    pub fn session_store(&self) -> &SessionMemoryStore {
        &self.inner.sessions
    }

    /// Get the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.inner.cart_store.catalog()
    }
}

/// Read and validate a JSON catalog file.
fn load_catalog(path: &Path) -> Result<Catalog, CatalogLoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Catalog::from_json(&json).map_err(|source| CatalogLoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}
