//! Adapter behavior against a stubbed provider HTTP API: auth headers,
//! wire-format mapping, status vocabulary normalization, and the two
//! failure shapes (provider rejection vs transport failure).

use secrecy::SecretString;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stablecoin_payout_gateway::domain::{
    BeneficiaryDetails, CreateCustomerRequest, CreatePayoutRequest, CreateQuoteRequest,
    CustomerType, OperationResult, PaginationParams, PayoutProvider, PayoutStatus, ProviderId,
    VerificationStatus,
};
use stablecoin_payout_gateway::infra::providers::{AtlasPayAdapter, BridgeWireAdapter};
use stablecoin_payout_gateway::infra::webhook::compute_signature;
use stablecoin_payout_gateway::infra::{PROVIDER_ERROR, ProviderSettings};

fn settings(base_url: &str) -> ProviderSettings {
    ProviderSettings {
        enabled: true,
        base_url: base_url.to_string(),
        api_key: SecretString::from("test-key"),
        client_id: "client-1".to_string(),
        webhook_secret: Some(SecretString::from("whsec_test")),
        timeout_secs: 2,
        retry_count: 1,
    }
}

fn customer_request() -> CreateCustomerRequest {
    CreateCustomerRequest {
        customer_type: CustomerType::Individual,
        full_name: "Ada Okafor".to_string(),
        email: "ada@example.com".to_string(),
        country: "NG".to_string(),
    }
}

fn payout_request() -> CreatePayoutRequest {
    CreatePayoutRequest {
        quote_id: None,
        external_id: Some("ext-7".to_string()),
        customer_id: "cus_1".to_string(),
        source_currency: "USDC".to_string(),
        target_currency: "NGN".to_string(),
        source_amount: 100.0,
        network: Some("polygon".to_string()),
        beneficiary: BeneficiaryDetails {
            name: "Ada Okafor".to_string(),
            account_reference: "0123456789".to_string(),
            bank_name: Some("GTBank".to_string()),
            country: Some("NG".to_string()),
        },
    }
}

#[tokio::test]
async fn atlaspay_create_customer_sends_auth_and_maps_wire_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .and(header("X-Api-Key", "test-key"))
        .and(header("X-Merchant-Id", "client-1"))
        .respond_with(ResponseTemplate::new(201).set_body_string(
            r#"{
                "id": "cus_9",
                "customerType": "INDIVIDUAL",
                "fullName": "Ada Okafor",
                "email": "ada@example.com",
                "country": "NG",
                "verificationStatus": "APPROVED",
                "createdAt": "2026-08-01T10:00:00Z",
                "updatedAt": "2026-08-01T10:00:00Z"
            }"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = AtlasPayAdapter::from_settings(&settings(&server.uri())).unwrap();
    let customer = adapter
        .create_customer(&customer_request())
        .await
        .into_data()
        .unwrap();

    assert_eq!(customer.id, "cus_9");
    assert_eq!(customer.provider, ProviderId::AtlasPay);
    assert_eq!(customer.verification_status, VerificationStatus::Approved);
}

#[tokio::test]
async fn atlaspay_rejection_surfaces_operation_code_and_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .respond_with(
            ResponseTemplate::new(422).set_body_string(r#"{"error":"beneficiary bank unsupported"}"#),
        )
        .mount(&server)
        .await;

    let adapter = AtlasPayAdapter::from_settings(&settings(&server.uri())).unwrap();
    let result = adapter.create_payout(&payout_request()).await;

    match result {
        OperationResult::Failed { code, message } => {
            assert_eq!(code, "PAYOUT_CREATE_FAILED");
            assert!(message.contains("beneficiary bank unsupported"));
        }
        OperationResult::Ok(_) => panic!("expected a failed result"),
    }
}

#[tokio::test]
async fn atlaspay_unreachable_host_is_a_provider_error() {
    let adapter = AtlasPayAdapter::from_settings(&settings("http://127.0.0.1:1")).unwrap();
    let result = adapter
        .create_quote(&CreateQuoteRequest {
            source_currency: "USDC".to_string(),
            target_currency: "NGN".to_string(),
            source_amount: 100.0,
            network: None,
        })
        .await;

    assert_eq!(result.error_code(), Some(PROVIDER_ERROR));
}

#[tokio::test]
async fn atlaspay_health_check_reflects_endpoint_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"ok"}"#))
        .mount(&server)
        .await;

    let adapter = AtlasPayAdapter::from_settings(&settings(&server.uri())).unwrap();
    assert!(adapter.health_check().await.is_ok());

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(adapter.health_check().await.is_err());
}

#[tokio::test]
async fn atlaspay_unknown_status_string_maps_to_conservative_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/ord_1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"BRAND_NEW_STATE"}"#))
        .mount(&server)
        .await;

    let adapter = AtlasPayAdapter::from_settings(&settings(&server.uri())).unwrap();
    let status = adapter.payout_status("ord_1").await.into_data().unwrap();
    assert_eq!(status, PayoutStatus::Created);
}

#[tokio::test]
async fn atlaspay_list_customers_passes_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .and(query_param("limit", "5"))
        .and(query_param("startingAfter", "cus_4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = AtlasPayAdapter::from_settings(&settings(&server.uri())).unwrap();
    let params = PaginationParams {
        limit: 5,
        cursor: Some("cus_4".to_string()),
    };
    let customers = adapter.list_customers(&params).await.into_data().unwrap();
    assert!(customers.is_empty());
}

#[tokio::test]
async fn bridgewire_get_payout_sends_bearer_and_maps_transfer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/transfers/tr_1"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("X-Client-Id", "client-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "id": "tr_1",
                "reference": "inv-9",
                "state": "settled",
                "sell_currency": "USDT",
                "sell_amount": "250.00",
                "buy_currency": "KES",
                "buy_amount": "32250.00",
                "rate": "129",
                "total_fees": "2.50",
                "chain": "tron",
                "recipient": {"full_name": "Jomo Mwangi", "account_identifier": "0123"},
                "chain_tx_id": "abcd",
                "created_at": "2026-08-01T10:00:00Z",
                "updated_at": "2026-08-01T12:00:00Z",
                "settled_at": "2026-08-01T12:00:00Z"
            }"#,
        ))
        .mount(&server)
        .await;

    let adapter = BridgeWireAdapter::from_settings(&settings(&server.uri())).unwrap();
    let payout = adapter.get_payout("tr_1").await.into_data().unwrap();

    assert_eq!(payout.provider, ProviderId::BridgeWire);
    assert_eq!(payout.status, PayoutStatus::Completed);
    assert_eq!(payout.external_id.as_deref(), Some("inv-9"));
    assert_eq!(payout.beneficiary.account_reference.as_deref(), Some("0123"));
    assert!(payout.completed_at.is_some());
}

#[tokio::test]
async fn bridgewire_quote_maps_rate_wire_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/rates"))
        .respond_with(ResponseTemplate::new(201).set_body_string(
            r#"{
                "id": "rate_3",
                "sell_currency": "USDC",
                "buy_currency": "NGN",
                "sell_amount": "100.00",
                "buy_amount": "155000.00",
                "rate": "1550",
                "total_fees": "1.00",
                "fee_lines": [{"label": "fx_spread", "amount": "1.00", "currency": "USDC"}],
                "chain": "polygon",
                "created_at": "2026-08-01T10:00:00Z",
                "valid_until": "2026-08-01T10:10:00Z"
            }"#,
        ))
        .mount(&server)
        .await;

    let adapter = BridgeWireAdapter::from_settings(&settings(&server.uri())).unwrap();
    let quote = adapter
        .create_quote(&CreateQuoteRequest {
            source_currency: "USDC".to_string(),
            target_currency: "NGN".to_string(),
            source_amount: 100.0,
            network: Some("polygon".to_string()),
        })
        .await
        .into_data()
        .unwrap();

    assert_eq!(quote.id, "rate_3");
    assert_eq!(quote.provider, ProviderId::BridgeWire);
    assert_eq!(quote.fee_breakdown.len(), 1);
    assert_eq!(quote.fee_breakdown[0].name, "fx_spread");
}

#[tokio::test]
async fn bridgewire_undecodable_success_body_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/transfers/tr_2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway page</html>"))
        .mount(&server)
        .await;

    let adapter = BridgeWireAdapter::from_settings(&settings(&server.uri())).unwrap();
    let result = adapter.get_payout("tr_2").await;
    assert_eq!(result.error_code(), Some(PROVIDER_ERROR));
}

#[tokio::test]
async fn webhook_validation_uses_configured_secret() {
    let adapter = AtlasPayAdapter::from_settings(&settings("http://127.0.0.1:1")).unwrap();
    let payload = br#"{"event":"payout.completed","id":"po_1"}"#;
    let signature = compute_signature(b"whsec_test", payload);

    assert!(adapter.validate_webhook(payload, &signature));
    assert!(!adapter.validate_webhook(b"tampered", &signature));
    assert!(!adapter.validate_webhook(payload, "deadbeef"));
}

#[tokio::test]
async fn webhook_validation_without_secret_accepts_everything() {
    let mut unsecured = settings("http://127.0.0.1:1");
    unsecured.webhook_secret = None;
    let adapter = BridgeWireAdapter::from_settings(&unsecured).unwrap();

    assert!(adapter.validate_webhook(b"anything", "any-signature"));
}
