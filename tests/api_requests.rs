//! End-to-end HTTP tests over the router with mock providers behind it.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use stablecoin_payout_gateway::api::create_router;
use stablecoin_payout_gateway::app::{AppState, ProviderRegistry};
use stablecoin_payout_gateway::domain::ProviderId;
use stablecoin_payout_gateway::infra::webhook::compute_signature;
use stablecoin_payout_gateway::test_utils::{MockProvider, MockProviderConfig};

fn router_of(providers: Vec<Arc<MockProvider>>, default: ProviderId) -> Router {
    let mut registry = ProviderRegistry::new(default);
    for p in providers {
        registry.register(p);
    }
    create_router(AppState::new(Arc::new(registry), true))
}

fn both_healthy() -> Router {
    router_of(
        vec![
            Arc::new(MockProvider::healthy(ProviderId::AtlasPay)),
            Arc::new(MockProvider::healthy(ProviderId::BridgeWire)),
        ],
        ProviderId::AtlasPay,
    )
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn customer_body() -> Value {
    json!({
        "customer_type": "individual",
        "full_name": "Ada Okafor",
        "email": "ada@example.com",
        "country": "NG"
    })
}

#[tokio::test]
async fn liveness_is_always_ok() {
    let response = both_healthy().oneshot(get("/health/live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn gateway_health_reports_per_provider_results() {
    let router = router_of(
        vec![
            Arc::new(MockProvider::healthy(ProviderId::AtlasPay)),
            Arc::new(MockProvider::unhealthy(ProviderId::BridgeWire)),
        ],
        ProviderId::AtlasPay,
    );

    let response = router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["providers"]["atlaspay"]["healthy"], true);
    assert_eq!(body["providers"]["bridgewire"]["healthy"], false);
}

#[tokio::test]
async fn readiness_fails_when_no_provider_is_reachable() {
    let router = router_of(
        vec![Arc::new(MockProvider::unhealthy(ProviderId::AtlasPay))],
        ProviderId::AtlasPay,
    );

    let response = router.oneshot(get("/health/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn create_customer_returns_enveloped_result() {
    let response = both_healthy()
        .oneshot(post_json("/api/v1/customers", customer_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["provider"], "atlaspay");
    assert!(body["error_code"].is_null());
}

#[tokio::test]
async fn invalid_request_body_is_rejected_before_any_provider_call() {
    let atlas = Arc::new(MockProvider::healthy(ProviderId::AtlasPay));
    let router = router_of(vec![Arc::clone(&atlas)], ProviderId::AtlasPay);

    let mut bad = customer_body();
    bad["email"] = json!("not-an-email");
    let response = router
        .oneshot(post_json("/api/v1/customers", bad))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert_eq!(atlas.op_call_count(), 0);
}

#[tokio::test]
async fn provider_query_pins_execution() {
    let response = both_healthy()
        .oneshot(post_json(
            "/api/v1/customers?provider=bridgewire",
            customer_body(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["provider"], "bridgewire");
}

#[tokio::test]
async fn unknown_provider_query_is_a_bad_request() {
    let response = both_healthy()
        .oneshot(post_json("/api/v1/customers?provider=stripe", customer_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn all_providers_down_maps_to_service_unavailable() {
    let router = router_of(
        vec![
            Arc::new(MockProvider::unhealthy(ProviderId::AtlasPay)),
            Arc::new(MockProvider::unhealthy(ProviderId::BridgeWire)),
        ],
        ProviderId::AtlasPay,
    );

    let response = router
        .oneshot(post_json("/api/v1/quotes", json!({
            "source_currency": "USDC",
            "target_currency": "NGN",
            "source_amount": 100.0
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "ALL_PROVIDERS_UNAVAILABLE");
}

#[tokio::test]
async fn provider_rejection_maps_to_unprocessable_entity() {
    let mut failing = MockProviderConfig::new(ProviderId::AtlasPay);
    failing.fail_ops = Some("QUOTE_CREATE_FAILED".to_string());
    let router = router_of(
        vec![Arc::new(MockProvider::with_config(failing, true))],
        ProviderId::AtlasPay,
    );

    let response = router
        .oneshot(post_json("/api/v1/quotes", json!({
            "source_currency": "USDC",
            "target_currency": "NGN",
            "source_amount": 100.0
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "QUOTE_CREATE_FAILED");
}

#[tokio::test]
async fn quote_comparison_returns_quotes_from_every_provider() {
    let response = both_healthy()
        .oneshot(post_json("/api/v1/quotes/compare", json!({
            "source_currency": "USDC",
            "target_currency": "NGN",
            "source_amount": 100.0
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn webhook_with_valid_signature_is_acknowledged() {
    let mut config = MockProviderConfig::new(ProviderId::AtlasPay);
    config.webhook_secret = Some("whsec_test".to_string());
    let router = router_of(
        vec![Arc::new(MockProvider::with_config(config, true))],
        ProviderId::AtlasPay,
    );

    let payload = br#"{"event":"payout.completed","id":"po_1"}"#;
    let signature = compute_signature(b"whsec_test", payload);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/atlaspay")
        .header("content-type", "application/json")
        .header("x-webhook-signature", signature)
        .body(Body::from(payload.to_vec()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["received"], true);
    assert_eq!(body["data"]["provider"], "atlaspay");
}

#[tokio::test]
async fn webhook_with_bad_signature_is_unauthorized() {
    let mut config = MockProviderConfig::new(ProviderId::AtlasPay);
    config.webhook_secret = Some("whsec_test".to_string());
    let router = router_of(
        vec![Arc::new(MockProvider::with_config(config, true))],
        ProviderId::AtlasPay,
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/atlaspay")
        .header("x-webhook-signature", "deadbeef")
        .body(Body::from(r#"{"event":"payout.completed"}"#))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error_code"], "AUTHENTICATION_FAILED");
}

#[tokio::test]
async fn webhook_without_signature_header_is_unauthorized() {
    let mut config = MockProviderConfig::new(ProviderId::AtlasPay);
    config.webhook_secret = Some("whsec_test".to_string());
    let router = router_of(
        vec![Arc::new(MockProvider::with_config(config, true))],
        ProviderId::AtlasPay,
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/atlaspay")
        .body(Body::from("{}"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn payout_status_endpoint_returns_normalized_status() {
    let response = both_healthy()
        .oneshot(get("/api/v1/payouts/po_1/status"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], "awaiting_funds");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = both_healthy()
        .oneshot(get("/api-docs/openapi.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/v1/payouts"].is_object());
}
