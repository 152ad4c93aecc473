//! Health-based provider selection and failover.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::{PayoutProvider, ProviderId, SelectionError};

use super::prober::HealthProber;
use super::registry::ProviderRegistry;

/// Chooses a healthy adapter for each call, falling back across the registry
/// when the preferred or default provider is down.
///
/// Two distinct policies live here and must not be conflated:
/// - `select` probes the target first and, on failure, walks the remaining
///   adapters sequentially in registration order, returning the first
///   healthy one. Sequential probing avoids hitting providers that are never
///   needed, at the cost of worst-case latency proportional to provider
///   count.
/// - `best_available` probes everything concurrently and prefers the
///   configured default among the healthy set, then lowest latency.
pub struct FailoverSelector {
    registry: Arc<ProviderRegistry>,
    prober: HealthProber,
    failover_enabled: bool,
}

impl FailoverSelector {
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, failover_enabled: bool) -> Self {
        Self {
            registry,
            prober: HealthProber::new(),
            failover_enabled,
        }
    }

    /// Select a healthy adapter, preferring `preferred` when given, the
    /// configured default otherwise.
    ///
    /// A resolution failure (unregistered identifier) never triggers
    /// failover; only a health failure does. All returned errors are
    /// non-retryable without an external state change.
    #[instrument(skip(self), fields(default = %self.registry.default_id()))]
    pub async fn select(
        &self,
        preferred: Option<ProviderId>,
    ) -> Result<Arc<dyn PayoutProvider>, SelectionError> {
        let target_id = preferred.unwrap_or_else(|| self.registry.default_id());
        let target = self.registry.get(target_id)?;

        // Common path: target is healthy, no other adapter is probed.
        if self.prober.probe(target).await.healthy {
            return Ok(Arc::clone(target));
        }

        if !self.failover_enabled {
            warn!(provider = %target_id, "Target unhealthy and failover disabled");
            return Err(SelectionError::ProviderUnavailable(target_id));
        }

        // Sequential walk in registration order; first healthy wins.
        for candidate in self.registry.all() {
            if candidate.id() == target_id {
                continue;
            }
            if self.prober.probe(candidate).await.healthy {
                info!(
                    from = %target_id,
                    to = %candidate.id(),
                    "Failing over to healthy provider"
                );
                return Ok(Arc::clone(candidate));
            }
        }

        warn!("No healthy provider found after probing the full registry");
        Err(SelectionError::AllProvidersUnavailable)
    }

    /// Pick the best currently-healthy adapter: the configured default if it
    /// is healthy, otherwise the lowest-latency healthy candidate.
    pub async fn best_available(&self) -> Result<Arc<dyn PayoutProvider>, SelectionError> {
        let results = self.prober.check_all(&self.registry).await;

        let default_id = self.registry.default_id();
        if results.get(&default_id).is_some_and(|r| r.healthy) {
            return self.registry.get(default_id).map(Arc::clone);
        }

        let fastest = results
            .iter()
            .filter(|(_, r)| r.healthy)
            .min_by_key(|(_, r)| r.latency_ms)
            .map(|(id, _)| *id);

        match fastest {
            Some(id) => self.registry.get(id).map(Arc::clone),
            None => Err(SelectionError::AllProvidersUnavailable),
        }
    }

    /// The registry this selector draws from
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn failover_enabled(&self) -> bool {
        self.failover_enabled
    }
}
