//! Failover selection and health probing behavior, driven by scriptable
//! mock providers that record how often they were probed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use stablecoin_payout_gateway::app::{FailoverSelector, HealthProber, ProviderRegistry};
use stablecoin_payout_gateway::domain::{PayoutProvider, ProviderId, SelectionError};
use stablecoin_payout_gateway::test_utils::{MockProvider, MockProviderConfig};

fn registry_of(
    providers: &[&Arc<MockProvider>],
    default: ProviderId,
) -> Arc<ProviderRegistry> {
    let mut registry = ProviderRegistry::new(default);
    for p in providers {
        registry.register(Arc::clone(p) as Arc<dyn PayoutProvider>);
    }
    Arc::new(registry)
}

#[tokio::test]
async fn healthy_target_is_selected_without_probing_others() {
    let atlas = Arc::new(MockProvider::healthy(ProviderId::AtlasPay));
    let bridge = Arc::new(MockProvider::healthy(ProviderId::BridgeWire));
    let registry = registry_of(&[&atlas, &bridge], ProviderId::AtlasPay);
    let selector = FailoverSelector::new(registry, true);

    let selected = selector.select(None).await.unwrap();

    assert_eq!(selected.id(), ProviderId::AtlasPay);
    assert_eq!(atlas.health_call_count(), 1);
    assert_eq!(bridge.health_call_count(), 0);
}

#[tokio::test]
async fn preferred_provider_overrides_default() {
    let atlas = Arc::new(MockProvider::healthy(ProviderId::AtlasPay));
    let bridge = Arc::new(MockProvider::healthy(ProviderId::BridgeWire));
    let registry = registry_of(&[&atlas, &bridge], ProviderId::AtlasPay);
    let selector = FailoverSelector::new(registry, true);

    let selected = selector.select(Some(ProviderId::BridgeWire)).await.unwrap();

    assert_eq!(selected.id(), ProviderId::BridgeWire);
    assert_eq!(atlas.health_call_count(), 0);
}

#[tokio::test]
async fn unregistered_default_is_a_resolution_error_not_a_failover() {
    let atlas = Arc::new(MockProvider::healthy(ProviderId::AtlasPay));
    let registry = registry_of(&[&atlas], ProviderId::BridgeWire);
    let selector = FailoverSelector::new(registry, true);

    let err = selector.select(None).await.err().unwrap();

    assert_eq!(
        err,
        SelectionError::ProviderNotFound("bridgewire".to_string())
    );
    // Resolution failed before any probing; the healthy adapter was never touched.
    assert_eq!(atlas.health_call_count(), 0);
}

#[tokio::test]
async fn unhealthy_target_with_failover_disabled_probes_nothing_else() {
    let atlas = Arc::new(MockProvider::unhealthy(ProviderId::AtlasPay));
    let bridge = Arc::new(MockProvider::healthy(ProviderId::BridgeWire));
    let registry = registry_of(&[&atlas, &bridge], ProviderId::AtlasPay);
    let selector = FailoverSelector::new(registry, false);

    let err = selector.select(None).await.err().unwrap();

    assert_eq!(err, SelectionError::ProviderUnavailable(ProviderId::AtlasPay));
    assert_eq!(atlas.health_call_count(), 1);
    assert_eq!(bridge.health_call_count(), 0);
}

#[tokio::test]
async fn failover_walks_to_first_healthy_candidate() {
    let atlas = Arc::new(MockProvider::unhealthy(ProviderId::AtlasPay));
    let bridge = Arc::new(MockProvider::healthy(ProviderId::BridgeWire));
    let registry = registry_of(&[&atlas, &bridge], ProviderId::AtlasPay);
    let selector = FailoverSelector::new(registry, true);

    let selected = selector.select(None).await.unwrap();

    assert_eq!(selected.id(), ProviderId::BridgeWire);
    assert_eq!(atlas.health_call_count(), 1);
    assert_eq!(bridge.health_call_count(), 1);
}

#[tokio::test]
async fn all_unhealthy_probes_each_exactly_once() {
    let atlas = Arc::new(MockProvider::unhealthy(ProviderId::AtlasPay));
    let bridge = Arc::new(MockProvider::unhealthy(ProviderId::BridgeWire));
    let registry = registry_of(&[&atlas, &bridge], ProviderId::AtlasPay);
    let selector = FailoverSelector::new(registry, true);

    let err = selector.select(None).await.err().unwrap();

    assert_eq!(err, SelectionError::AllProvidersUnavailable);
    assert_eq!(atlas.health_call_count(), 1);
    assert_eq!(bridge.health_call_count(), 1);
}

#[tokio::test]
async fn recovered_provider_is_selected_again() {
    let atlas = Arc::new(MockProvider::unhealthy(ProviderId::AtlasPay));
    let bridge = Arc::new(MockProvider::healthy(ProviderId::BridgeWire));
    let registry = registry_of(&[&atlas, &bridge], ProviderId::AtlasPay);
    let selector = FailoverSelector::new(registry, true);

    assert_eq!(
        selector.select(None).await.unwrap().id(),
        ProviderId::BridgeWire
    );

    atlas.set_healthy(true);
    assert_eq!(
        selector.select(None).await.unwrap().id(),
        ProviderId::AtlasPay
    );
}

#[tokio::test]
async fn check_all_runs_probes_concurrently() {
    let mut slow_a = MockProviderConfig::new(ProviderId::AtlasPay);
    slow_a.probe_delay = Some(Duration::from_millis(50));
    let mut slow_b = MockProviderConfig::new(ProviderId::BridgeWire);
    slow_b.probe_delay = Some(Duration::from_millis(50));

    let atlas = Arc::new(MockProvider::with_config(slow_a, true));
    let bridge = Arc::new(MockProvider::with_config(slow_b, false));
    let registry = registry_of(&[&atlas, &bridge], ProviderId::AtlasPay);

    let started = Instant::now();
    let results = HealthProber::new().check_all(&registry).await;
    let elapsed = started.elapsed();

    // Sequential probing would take at least 100ms.
    assert!(
        elapsed < Duration::from_millis(95),
        "probes ran sequentially: {elapsed:?}"
    );

    assert_eq!(results.len(), 2);
    assert!(results[&ProviderId::AtlasPay].healthy);
    let down = &results[&ProviderId::BridgeWire];
    assert!(!down.healthy);
    assert!(down.message.as_deref().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn best_available_prefers_healthy_default_over_faster_candidate() {
    let mut slow_default = MockProviderConfig::new(ProviderId::AtlasPay);
    slow_default.probe_delay = Some(Duration::from_millis(30));

    let atlas = Arc::new(MockProvider::with_config(slow_default, true));
    let bridge = Arc::new(MockProvider::healthy(ProviderId::BridgeWire));
    let registry = registry_of(&[&atlas, &bridge], ProviderId::AtlasPay);
    let selector = FailoverSelector::new(registry, true);

    let best = selector.best_available().await.unwrap();
    assert_eq!(best.id(), ProviderId::AtlasPay);
}

#[tokio::test]
async fn best_available_falls_back_to_healthy_candidate() {
    let atlas = Arc::new(MockProvider::unhealthy(ProviderId::AtlasPay));
    let bridge = Arc::new(MockProvider::healthy(ProviderId::BridgeWire));
    let registry = registry_of(&[&atlas, &bridge], ProviderId::AtlasPay);
    let selector = FailoverSelector::new(registry, true);

    let best = selector.best_available().await.unwrap();
    assert_eq!(best.id(), ProviderId::BridgeWire);
}

#[tokio::test]
async fn best_available_with_no_healthy_provider_fails() {
    let atlas = Arc::new(MockProvider::unhealthy(ProviderId::AtlasPay));
    let bridge = Arc::new(MockProvider::unhealthy(ProviderId::BridgeWire));
    let registry = registry_of(&[&atlas, &bridge], ProviderId::AtlasPay);
    let selector = FailoverSelector::new(registry, true);

    assert_eq!(
        selector.best_available().await.err().unwrap(),
        SelectionError::AllProvidersUnavailable
    );
}

#[tokio::test]
async fn duplicate_registration_is_ignored() {
    let atlas = Arc::new(MockProvider::healthy(ProviderId::AtlasPay));
    let twin = Arc::new(MockProvider::healthy(ProviderId::AtlasPay));

    let mut registry = ProviderRegistry::new(ProviderId::AtlasPay);
    registry.register(Arc::clone(&atlas) as Arc<dyn PayoutProvider>);
    registry.register(Arc::clone(&twin) as Arc<dyn PayoutProvider>);

    assert_eq!(registry.len(), 1);
    let kept = registry.get(ProviderId::AtlasPay).unwrap();
    let original: Arc<dyn stablecoin_payout_gateway::domain::PayoutProvider> = atlas;
    assert!(Arc::ptr_eq(kept, &original));
}
