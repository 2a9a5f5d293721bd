//! The advisory facade used by the UI layer.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::content::ContentStore;
use crate::error::Result;

use super::backend::{AdvisorBackend, ProviderStatus};
use super::selector::{create_backend, list_available, resolve_default_config, ProviderInfo};
use super::types::{AdvisorResponse, BackendConfig, CatalogEntry, ContextOverrides};

/// Owns the active backend and the cached service catalog.
///
/// Both cells are swapped wholesale. An `analyze_need` already in flight
/// finishes against the backend it started with.
pub struct AdvisorAgent {
    store: Arc<dyn ContentStore>,
    catalog: RwLock<Arc<Vec<CatalogEntry>>>,
    backend: RwLock<Arc<dyn AdvisorBackend>>,
}

impl AdvisorAgent {
    /// Agent over the backend described by `config`.
    pub fn new(store: Arc<dyn ContentStore>, config: &BackendConfig) -> Self {
        Self::with_backend(store, create_backend(config))
    }

    /// Agent over the backend resolved from the process environment.
    pub fn from_env(store: Arc<dyn ContentStore>) -> Self {
        Self::new(store, &resolve_default_config())
    }

    pub fn with_backend(store: Arc<dyn ContentStore>, backend: Arc<dyn AdvisorBackend>) -> Self {
        Self {
            store,
            catalog: RwLock::new(Arc::new(Vec::new())),
            backend: RwLock::new(backend),
        }
    }

    /// Load the service catalog from the content store.
    ///
    /// Best effort: a store failure is logged and leaves the catalog empty.
    /// Calling again refreshes the catalog.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        let services = match self.store.fetch_services().await {
            Ok(services) => {
                info!(count = services.len(), "Loaded service catalog");
                services
            }
            Err(e) => {
                warn!(error = %e, "Failed to load services");
                Vec::new()
            }
        };
        *self.catalog.write().await = Arc::new(services);
    }

    /// The cached catalog snapshot.
    pub async fn services(&self) -> Arc<Vec<CatalogEntry>> {
        self.catalog.read().await.clone()
    }

    /// Analyze a need against the cached catalog with the active backend.
    pub async fn analyze_need(
        &self,
        input: &str,
        overrides: ContextOverrides,
    ) -> Result<AdvisorResponse> {
        let services = self.services().await.as_ref().clone();
        let backend = self.backend.read().await.clone();

        let context = overrides.into_context(services);
        backend.analyze(input, &context).await
    }

    /// Replace the active backend with a default-configured one of `provider`.
    ///
    /// Credentials of the previous backend are not carried over. Unknown
    /// providers resolve to the rule-based backend.
    pub async fn switch_provider(&self, provider: &str) -> ProviderStatus {
        let next = create_backend(&BackendConfig::new(provider));
        let status = ProviderStatus::of(next.as_ref());
        info!(provider = %provider, name = %status.name, "Switched provider");
        *self.backend.write().await = next;
        status
    }

    pub async fn current_provider(&self) -> ProviderStatus {
        let backend = self.backend.read().await.clone();
        ProviderStatus::of(backend.as_ref())
    }

    pub fn available_providers(&self) -> Vec<ProviderInfo> {
        list_available()
    }
}
