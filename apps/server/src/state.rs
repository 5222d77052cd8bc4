//! Shared application state handed to every handler

use std::sync::Arc;

use crate::{
    config::{Config, StoreBackend},
    services::SearchService,
    store::{DocumentStore, ElasticsearchStore, InMemoryStore},
    Result,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub search: Arc<SearchService>,
}

impl AppState {
    /// Build state with the store backend named in `config.store`.
    pub fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(InMemoryStore::new()),
            StoreBackend::Elasticsearch => Arc::new(ElasticsearchStore::new(&config.store)?),
        };
        tracing::info!(
            backend = ?config.store.backend,
            index = %config.store.index,
            "Document store configured"
        );
        Ok(Self::with_store(config, store))
    }

    /// Build state around an existing store.
    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let search = SearchService::new(store.clone())
            .with_max_suggestions(config.search.max_suggestions);
        Self {
            config: Arc::new(config),
            store,
            search: Arc::new(search),
        }
    }

    pub fn store_backend(&self) -> &'static str {
        match self.config.store.backend {
            StoreBackend::Memory => "memory",
            StoreBackend::Elasticsearch => "elasticsearch",
        }
    }
}
