//! Route table and OpenAPI document.

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app::AppState;

use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stablecoin Payout Gateway",
        description = "Unified API over stablecoin-to-fiat payout providers with health-based failover"
    ),
    paths(
        handlers::create_customer,
        handlers::list_customers,
        handlers::get_customer,
        handlers::update_customer,
        handlers::initiate_kyc,
        handlers::kyc_status,
        handlers::initiate_kyb,
        handlers::kyb_status,
        handlers::upload_document,
        handlers::get_documents,
        handlers::submit_verification,
        handlers::create_quote,
        handlers::compare_quotes,
        handlers::get_quote,
        handlers::create_payout,
        handlers::list_payouts,
        handlers::get_payout,
        handlers::payout_status,
        handlers::cancel_payout,
        handlers::gateway_health,
    ),
    components(schemas(
        crate::domain::ApiEnvelope<crate::domain::Customer>,
        crate::domain::Customer,
        crate::domain::CustomerType,
        crate::domain::ProviderId,
        crate::domain::VerificationStatus,
        crate::domain::VerificationLevel,
        crate::domain::VerificationInfo,
        crate::domain::VerificationCheck,
        crate::domain::VerificationDocument,
        crate::domain::RiskLevel,
        crate::domain::Quote,
        crate::domain::FeeComponent,
        crate::domain::Payout,
        crate::domain::PayoutParty,
        crate::domain::PayoutStatus,
        crate::domain::HealthStatus,
        crate::domain::HealthCheckResult,
        crate::domain::GatewayHealthResponse,
        crate::domain::CreateCustomerRequest,
        crate::domain::UpdateCustomerRequest,
        crate::domain::InitiateKycRequest,
        crate::domain::InitiateKybRequest,
        crate::domain::UploadDocumentRequest,
        crate::domain::SubmitVerificationRequest,
        crate::domain::CreateQuoteRequest,
        crate::domain::CreatePayoutRequest,
        crate::domain::BeneficiaryDetails,
        handlers::WebhookAck,
    )),
    tags(
        (name = "customers", description = "Customer onboarding"),
        (name = "verification", description = "KYC and KYB flows"),
        (name = "quotes", description = "Exchange quotes"),
        (name = "payouts", description = "Payout execution"),
        (name = "health", description = "Provider fleet health")
    )
)]
pub struct ApiDoc;

/// Build the full application router
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/customers", post(handlers::create_customer).get(handlers::list_customers))
        .route(
            "/customers/{customer_id}",
            get(handlers::get_customer).patch(handlers::update_customer),
        )
        .route(
            "/customers/{customer_id}/documents",
            get(handlers::get_documents),
        )
        .route("/kyc", post(handlers::initiate_kyc))
        .route("/kyc/{customer_id}", get(handlers::kyc_status))
        .route("/kyb", post(handlers::initiate_kyb))
        .route("/kyb/{customer_id}", get(handlers::kyb_status))
        .route("/documents", post(handlers::upload_document))
        .route("/verifications/submit", post(handlers::submit_verification))
        .route("/quotes", post(handlers::create_quote))
        .route("/quotes/compare", post(handlers::compare_quotes))
        .route("/quotes/{quote_id}", get(handlers::get_quote))
        .route("/payouts", post(handlers::create_payout).get(handlers::list_payouts))
        .route("/payouts/{payout_id}", get(handlers::get_payout))
        .route("/payouts/{payout_id}/status", get(handlers::payout_status))
        .route("/payouts/{payout_id}/cancel", post(handlers::cancel_payout))
        .route("/webhooks/{provider}", post(handlers::provider_webhook));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1", api)
        .route("/health", get(handlers::gateway_health))
        .route("/health/live", get(handlers::liveness))
        .route("/health/ready", get(handlers::readiness))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
