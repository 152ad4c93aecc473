//! Concurrent health probing across registered providers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::domain::{HealthCheckResult, PayoutProvider, ProviderId};

use super::registry::ProviderRegistry;

/// Probes provider adapters and converts the outcome into
/// [`HealthCheckResult`] values. A failing probe is data, never an error:
/// one unreachable provider must not abort the others.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthProber;

impl HealthProber {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Probe a single adapter, recording wall-clock latency around the call
    pub async fn probe(&self, adapter: &Arc<dyn PayoutProvider>) -> HealthCheckResult {
        let started = Instant::now();
        let outcome = adapter.health_check().await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => {
                debug!(provider = %adapter.id(), latency_ms, "Health probe ok");
                HealthCheckResult::healthy(latency_ms)
            }
            Err(e) => {
                warn!(provider = %adapter.id(), latency_ms, error = %e, "Health probe failed");
                HealthCheckResult::unhealthy(e.to_string(), latency_ms)
            }
        }
    }

    /// Probe every registered adapter concurrently and join on all of them.
    ///
    /// Fan-out is structured: dropping the returned future cancels every
    /// in-flight probe with it. One probe hanging is bounded by that
    /// adapter's own HTTP timeout, not by the other probes.
    #[instrument(skip_all, fields(providers = registry.len()))]
    pub async fn check_all(
        &self,
        registry: &ProviderRegistry,
    ) -> HashMap<ProviderId, HealthCheckResult> {
        let probes = registry.all().iter().map(|adapter| async move {
            let result = self.probe(adapter).await;
            (adapter.id(), result)
        });

        join_all(probes).await.into_iter().collect()
    }
}
