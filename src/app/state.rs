//! Application state management.

use std::sync::Arc;

use crate::domain::{PayoutProvider, ProviderId, SelectionError};

use super::registry::ProviderRegistry;
use super::service::PayoutService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PayoutService>,
    pub registry: Arc<ProviderRegistry>,
}

impl AppState {
    /// Create application state around an assembled registry
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, failover_enabled: bool) -> Self {
        let service = Arc::new(PayoutService::new(Arc::clone(&registry), failover_enabled));
        Self { service, registry }
    }

    /// Resolve an adapter directly, bypassing selection. Used by webhook
    /// handlers, where the provider is fixed by the URL, not by health.
    pub fn adapter(&self, id: ProviderId) -> Result<&Arc<dyn PayoutProvider>, SelectionError> {
        self.registry.get(id)
    }
}
