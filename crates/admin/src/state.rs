//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::content::ContentStore;
use crate::store::{self, HostedStore, SharedStore, StoreError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: SharedStore,
    content: ContentStore,
}

impl AppState {
    /// Build state for `config`, connecting the hosted store it describes.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, StoreError> {
        let store = store::connect(&config)?;
        Ok(Self::with_store(config, store))
    }

    /// Build state around an existing store.
    #[must_use]
    pub fn with_store(config: AdminConfig, store: SharedStore) -> Self {
        let content = ContentStore::new(config.data_dir());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                content,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The hosted store.
    #[must_use]
    pub fn store(&self) -> &dyn HostedStore {
        self.inner.store.as_ref()
    }

    /// The storefront data files.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
