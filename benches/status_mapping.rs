use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use validator::Validate;

use stablecoin_payout_gateway::domain::{CreateQuoteRequest, PayoutStatus};
use stablecoin_payout_gateway::infra::providers::{atlaspay, bridgewire};

fn bench_status_mapping(c: &mut Criterion) {
    c.bench_function("map_atlaspay_payout_statuses", |b| {
        b.iter(|| {
            for status in atlaspay::KNOWN_PAYOUT_STATUSES {
                let _ = atlaspay::map_payout_status(black_box(status));
            }
        })
    });

    c.bench_function("map_bridgewire_transfer_states", |b| {
        b.iter(|| {
            for state in bridgewire::KNOWN_TRANSFER_STATES {
                let _ = bridgewire::map_transfer_state(black_box(state));
            }
        })
    });

    c.bench_function("map_unknown_status_fallback", |b| {
        b.iter(|| {
            let status = atlaspay::map_payout_status(black_box("SOMETHING_UNEXPECTED"));
            assert_eq!(status, PayoutStatus::Created);
        })
    });
}

fn bench_validation(c: &mut Criterion) {
    let request = CreateQuoteRequest {
        source_currency: "USDC".to_string(),
        target_currency: "NGN".to_string(),
        source_amount: 250.0,
        network: Some("polygon".to_string()),
    };

    c.bench_function("validate_quote_request", |b| {
        b.iter(|| {
            let _ = black_box(&request).validate();
        })
    });
}

criterion_group!(benches, bench_status_mapping, bench_validation);
criterion_main!(benches);
