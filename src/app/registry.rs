//! Registry of configured provider adapters.

use std::sync::Arc;

use tracing::warn;

use crate::domain::{PayoutProvider, ProviderId, SelectionError};

/// Holds the set of enabled provider adapters for the process lifetime.
///
/// Populated once at startup from configuration and immutable afterwards, so
/// concurrent reads need no locking. Passed by `Arc` into the selector and
/// facade; there is no ambient singleton.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn PayoutProvider>>,
    default_id: ProviderId,
}

impl ProviderRegistry {
    /// Create an empty registry with the configured default identifier.
    ///
    /// The default is not validated here: a default pointing at a disabled
    /// provider surfaces as `ProviderNotFound` on first use, mirroring how
    /// the configuration surface treats it as a latent misconfiguration.
    #[must_use]
    pub fn new(default_id: ProviderId) -> Self {
        Self {
            providers: Vec::new(),
            default_id,
        }
    }

    /// Register an adapter. Call once per enabled provider at startup;
    /// iteration order is registration order.
    pub fn register(&mut self, adapter: Arc<dyn PayoutProvider>) {
        if self.providers.iter().any(|p| p.id() == adapter.id()) {
            warn!(provider = %adapter.id(), "Provider already registered, ignoring duplicate");
            return;
        }
        self.providers.push(adapter);
    }

    /// Resolve an adapter by identifier
    pub fn get(&self, id: ProviderId) -> Result<&Arc<dyn PayoutProvider>, SelectionError> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| SelectionError::ProviderNotFound(id.to_string()))
    }

    /// Resolve the configured default adapter through `get`
    pub fn default_provider(&self) -> Result<&Arc<dyn PayoutProvider>, SelectionError> {
        self.get(self.default_id)
    }

    /// The configured default identifier
    pub fn default_id(&self) -> ProviderId {
        self.default_id
    }

    /// All registered adapters in stable registration order
    pub fn all(&self) -> &[Arc<dyn PayoutProvider>] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
