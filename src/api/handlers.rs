//! HTTP request handlers.
//!
//! Handlers own request validation and the mapping of outcomes onto HTTP:
//! selection failures become 5xx errors, operation failures become 4xx-class
//! envelopes with the provider's error code, successes are wrapped in the
//! uniform [`ApiEnvelope`].

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::app::AppState;
use crate::domain::{
    ApiEnvelope, AppError, CreateCustomerRequest, CreatePayoutRequest, CreateQuoteRequest,
    Customer, GatewayHealthResponse, HealthStatus, InitiateKybRequest, InitiateKycRequest,
    OperationResult, PaginationParams, Payout, PayoutStatus, ProviderId, ProviderQuery, Quote,
    SelectionError, SubmitVerificationRequest, UpdateCustomerRequest, UploadDocumentRequest,
    ValidationError, VerificationDocument, VerificationInfo,
};
use crate::infra::PROVIDER_ERROR;

const WEBHOOK_SIGNATURE_HEADER: &str = "x-webhook-signature";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Selection(SelectionError::ProviderNotFound(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_NOT_FOUND")
            }
            AppError::Selection(SelectionError::ProviderUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
            }
            AppError::Selection(SelectionError::AllProvidersUnavailable) => {
                (StatusCode::SERVICE_UNAVAILABLE, "ALL_PROVIDERS_UNAVAILABLE")
            }
            AppError::Provider(_) => (StatusCode::BAD_GATEWAY, PROVIDER_ERROR),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            error!(%code, error = %self, "Request failed");
        } else {
            warn!(%code, error = %self, "Request rejected");
        }

        let envelope: ApiEnvelope<serde_json::Value> = ApiEnvelope::error(code, self.to_string());
        (status, Json(envelope)).into_response()
    }
}

/// Run DTO validation, converting validator output into the app error shape
fn validated<T: Validate>(req: T) -> Result<T, AppError> {
    req.validate()
        .map_err(|e| ValidationError::Multiple(e.to_string()))?;
    Ok(req)
}

/// Map an operation outcome onto HTTP. Provider rejections are client-class
/// failures; transport-level `PROVIDER_ERROR` is a bad gateway.
fn respond<T: serde::Serialize + ToSchema>(ok_status: StatusCode, result: OperationResult<T>) -> Response {
    match result {
        OperationResult::Ok(data) => (ok_status, Json(ApiEnvelope::ok(data))).into_response(),
        OperationResult::Failed { code, message } => {
            let status = if code == PROVIDER_ERROR {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            (status, Json(ApiEnvelope::<T>::error(code, message))).into_response()
        }
    }
}

/// Query parameters shared by list endpoints
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Provider to use; omitted means default-with-failover
    pub provider: Option<ProviderId>,
    /// Maximum number of items to return (1-100, default: 20)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Opaque provider cursor to start after
    pub cursor: Option<String>,
}

fn default_list_limit() -> i64 {
    20
}

impl ListQuery {
    fn pagination(&self) -> Result<PaginationParams, AppError> {
        validated(PaginationParams {
            limit: self.limit,
            cursor: self.cursor.clone(),
        })
    }
}

/// Acknowledgement returned to a provider's webhook delivery
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
    pub provider: ProviderId,
}

// ============================================================================
// CUSTOMERS
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "customers",
    params(ProviderQuery),
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = ApiEnvelope<Customer>),
        (status = 400, description = "Invalid request"),
        (status = 503, description = "No provider available")
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Query(query): Query<ProviderQuery>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<Response, AppError> {
    let req = validated(req)?;
    let result = state.service.create_customer(query.provider, &req).await?;
    Ok(respond(StatusCode::CREATED, result))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "customers",
    params(ListQuery),
    responses(
        (status = 200, description = "Customers listed", body = ApiEnvelope<Vec<Customer>>)
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let params = query.pagination()?;
    let result = state.service.list_customers(query.provider, &params).await?;
    Ok(respond(StatusCode::OK, result))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{customer_id}",
    tag = "customers",
    params(
        ("customer_id" = String, Path, description = "Provider customer identifier"),
        ProviderQuery
    ),
    responses(
        (status = 200, description = "Customer found", body = ApiEnvelope<Customer>),
        (status = 422, description = "Provider rejected the lookup")
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Query(query): Query<ProviderQuery>,
) -> Result<Response, AppError> {
    let result = state
        .service
        .get_customer(query.provider, &customer_id)
        .await?;
    Ok(respond(StatusCode::OK, result))
}

#[utoipa::path(
    patch,
    path = "/api/v1/customers/{customer_id}",
    tag = "customers",
    params(
        ("customer_id" = String, Path, description = "Provider customer identifier"),
        ProviderQuery
    ),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiEnvelope<Customer>)
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Query(query): Query<ProviderQuery>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Response, AppError> {
    let req = validated(req)?;
    let result = state
        .service
        .update_customer(query.provider, &customer_id, &req)
        .await?;
    Ok(respond(StatusCode::OK, result))
}

// ============================================================================
// KYC / KYB
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/v1/kyc",
    tag = "verification",
    params(ProviderQuery),
    request_body = InitiateKycRequest,
    responses(
        (status = 201, description = "KYC flow started", body = ApiEnvelope<VerificationInfo>)
    )
)]
pub async fn initiate_kyc(
    State(state): State<AppState>,
    Query(query): Query<ProviderQuery>,
    Json(req): Json<InitiateKycRequest>,
) -> Result<Response, AppError> {
    let req = validated(req)?;
    let result = state.service.initiate_kyc(query.provider, &req).await?;
    Ok(respond(StatusCode::CREATED, result))
}

#[utoipa::path(
    get,
    path = "/api/v1/kyc/{customer_id}",
    tag = "verification",
    params(
        ("customer_id" = String, Path, description = "Provider customer identifier"),
        ProviderQuery
    ),
    responses(
        (status = 200, description = "KYC status", body = ApiEnvelope<VerificationInfo>)
    )
)]
pub async fn kyc_status(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Query(query): Query<ProviderQuery>,
) -> Result<Response, AppError> {
    let result = state.service.kyc_status(query.provider, &customer_id).await?;
    Ok(respond(StatusCode::OK, result))
}

#[utoipa::path(
    post,
    path = "/api/v1/kyb",
    tag = "verification",
    params(ProviderQuery),
    request_body = InitiateKybRequest,
    responses(
        (status = 201, description = "KYB flow started", body = ApiEnvelope<VerificationInfo>)
    )
)]
pub async fn initiate_kyb(
    State(state): State<AppState>,
    Query(query): Query<ProviderQuery>,
    Json(req): Json<InitiateKybRequest>,
) -> Result<Response, AppError> {
    let req = validated(req)?;
    let result = state.service.initiate_kyb(query.provider, &req).await?;
    Ok(respond(StatusCode::CREATED, result))
}

#[utoipa::path(
    get,
    path = "/api/v1/kyb/{customer_id}",
    tag = "verification",
    params(
        ("customer_id" = String, Path, description = "Provider customer identifier"),
        ProviderQuery
    ),
    responses(
        (status = 200, description = "KYB status", body = ApiEnvelope<VerificationInfo>)
    )
)]
pub async fn kyb_status(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Query(query): Query<ProviderQuery>,
) -> Result<Response, AppError> {
    let result = state.service.kyb_status(query.provider, &customer_id).await?;
    Ok(respond(StatusCode::OK, result))
}

#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = "verification",
    params(ProviderQuery),
    request_body = UploadDocumentRequest,
    responses(
        (status = 201, description = "Document attached", body = ApiEnvelope<VerificationDocument>)
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    Query(query): Query<ProviderQuery>,
    Json(req): Json<UploadDocumentRequest>,
) -> Result<Response, AppError> {
    let req = validated(req)?;
    let result = state.service.upload_document(query.provider, &req).await?;
    Ok(respond(StatusCode::CREATED, result))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{customer_id}/documents",
    tag = "verification",
    params(
        ("customer_id" = String, Path, description = "Provider customer identifier"),
        ProviderQuery
    ),
    responses(
        (status = 200, description = "Documents listed", body = ApiEnvelope<Vec<VerificationDocument>>)
    )
)]
pub async fn get_documents(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Query(query): Query<ProviderQuery>,
) -> Result<Response, AppError> {
    let result = state
        .service
        .get_documents(query.provider, &customer_id)
        .await?;
    Ok(respond(StatusCode::OK, result))
}

#[utoipa::path(
    post,
    path = "/api/v1/verifications/submit",
    tag = "verification",
    params(ProviderQuery),
    request_body = SubmitVerificationRequest,
    responses(
        (status = 200, description = "Verification submitted", body = ApiEnvelope<VerificationInfo>)
    )
)]
pub async fn submit_verification(
    State(state): State<AppState>,
    Query(query): Query<ProviderQuery>,
    Json(req): Json<SubmitVerificationRequest>,
) -> Result<Response, AppError> {
    let req = validated(req)?;
    let result = state
        .service
        .submit_verification(query.provider, &req)
        .await?;
    Ok(respond(StatusCode::OK, result))
}

// ============================================================================
// QUOTES
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/v1/quotes",
    tag = "quotes",
    params(ProviderQuery),
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote issued", body = ApiEnvelope<Quote>),
        (status = 422, description = "Provider declined to quote")
    )
)]
pub async fn create_quote(
    State(state): State<AppState>,
    Query(query): Query<ProviderQuery>,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<Response, AppError> {
    let req = validated(req)?;
    let result = state.service.create_quote(query.provider, &req).await?;
    Ok(respond(StatusCode::CREATED, result))
}

/// Quote the same request against every registered provider at once.
/// Providers that fail to quote are simply absent from the result.
#[utoipa::path(
    post,
    path = "/api/v1/quotes/compare",
    tag = "quotes",
    request_body = CreateQuoteRequest,
    responses(
        (status = 200, description = "Quotes from all responding providers", body = ApiEnvelope<Vec<Quote>>)
    )
)]
pub async fn compare_quotes(
    State(state): State<AppState>,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<Response, AppError> {
    let req = validated(req)?;
    let quotes = state.service.create_quotes_from_all_providers(&req).await;
    Ok((StatusCode::OK, Json(ApiEnvelope::ok(quotes))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/quotes/{quote_id}",
    tag = "quotes",
    params(
        ("quote_id" = String, Path, description = "Provider quote identifier"),
        ProviderQuery
    ),
    responses(
        (status = 200, description = "Quote found", body = ApiEnvelope<Quote>)
    )
)]
pub async fn get_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<String>,
    Query(query): Query<ProviderQuery>,
) -> Result<Response, AppError> {
    let result = state.service.get_quote(query.provider, &quote_id).await?;
    Ok(respond(StatusCode::OK, result))
}

// ============================================================================
// PAYOUTS
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/v1/payouts",
    tag = "payouts",
    params(ProviderQuery),
    request_body = CreatePayoutRequest,
    responses(
        (status = 201, description = "Payout created", body = ApiEnvelope<Payout>),
        (status = 422, description = "Provider rejected the payout"),
        (status = 503, description = "No provider available")
    )
)]
pub async fn create_payout(
    State(state): State<AppState>,
    Query(query): Query<ProviderQuery>,
    Json(req): Json<CreatePayoutRequest>,
) -> Result<Response, AppError> {
    let req = validated(req)?;
    let result = state.service.create_payout(query.provider, &req).await?;
    Ok(respond(StatusCode::CREATED, result))
}

#[utoipa::path(
    get,
    path = "/api/v1/payouts",
    tag = "payouts",
    params(ListQuery),
    responses(
        (status = 200, description = "Payouts listed", body = ApiEnvelope<Vec<Payout>>)
    )
)]
pub async fn list_payouts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let params = query.pagination()?;
    let result = state.service.list_payouts(query.provider, &params).await?;
    Ok(respond(StatusCode::OK, result))
}

#[utoipa::path(
    get,
    path = "/api/v1/payouts/{payout_id}",
    tag = "payouts",
    params(
        ("payout_id" = String, Path, description = "Provider payout identifier"),
        ProviderQuery
    ),
    responses(
        (status = 200, description = "Payout found", body = ApiEnvelope<Payout>)
    )
)]
pub async fn get_payout(
    State(state): State<AppState>,
    Path(payout_id): Path<String>,
    Query(query): Query<ProviderQuery>,
) -> Result<Response, AppError> {
    let result = state.service.get_payout(query.provider, &payout_id).await?;
    Ok(respond(StatusCode::OK, result))
}

#[utoipa::path(
    get,
    path = "/api/v1/payouts/{payout_id}/status",
    tag = "payouts",
    params(
        ("payout_id" = String, Path, description = "Provider payout identifier"),
        ProviderQuery
    ),
    responses(
        (status = 200, description = "Current payout status", body = ApiEnvelope<PayoutStatus>)
    )
)]
pub async fn payout_status(
    State(state): State<AppState>,
    Path(payout_id): Path<String>,
    Query(query): Query<ProviderQuery>,
) -> Result<Response, AppError> {
    let result = state
        .service
        .get_payout_status(query.provider, &payout_id)
        .await?;
    Ok(respond(StatusCode::OK, result))
}

#[utoipa::path(
    post,
    path = "/api/v1/payouts/{payout_id}/cancel",
    tag = "payouts",
    params(
        ("payout_id" = String, Path, description = "Provider payout identifier"),
        ProviderQuery
    ),
    responses(
        (status = 200, description = "Payout cancelled", body = ApiEnvelope<Payout>),
        (status = 422, description = "Payout can no longer be cancelled")
    )
)]
pub async fn cancel_payout(
    State(state): State<AppState>,
    Path(payout_id): Path<String>,
    Query(query): Query<ProviderQuery>,
) -> Result<Response, AppError> {
    let result = state
        .service
        .cancel_payout(query.provider, &payout_id)
        .await?;
    Ok(respond(StatusCode::OK, result))
}

// ============================================================================
// WEBHOOKS
// ============================================================================

/// Receive a provider webhook. The provider is fixed by the URL; selection
/// and failover are never involved. The signature is verified against the
/// raw body bytes before anything is parsed.
pub async fn provider_webhook(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let id: ProviderId = provider
        .parse()
        .map_err(|_| SelectionError::ProviderNotFound(provider.clone()))?;
    let adapter = state.adapter(id)?;

    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing webhook signature header".to_string()))?;

    if !adapter.validate_webhook(&body, signature) {
        return Err(AppError::Authentication(
            "Invalid webhook signature".to_string(),
        ));
    }

    if let Ok(event) = serde_json::from_slice::<serde_json::Value>(&body) {
        let kind = event
            .get("event")
            .or_else(|| event.get("type"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        info!(provider = %id, event = %kind, "Webhook received");
    } else {
        warn!(provider = %id, "Webhook body is not JSON");
    }

    Ok((
        StatusCode::OK,
        Json(ApiEnvelope::ok(WebhookAck {
            received: true,
            provider: id,
        })),
    )
        .into_response())
}

// ============================================================================
// HEALTH
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Aggregated provider fleet health", body = GatewayHealthResponse)
    )
)]
pub async fn gateway_health(State(state): State<AppState>) -> Json<GatewayHealthResponse> {
    Json(state.service.health().await)
}

/// Process liveness, independent of provider reachability
pub async fn liveness() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Ready to serve traffic only while at least one provider is reachable
pub async fn readiness(State(state): State<AppState>) -> Response {
    let report = state.service.health().await;
    let status = if report.status == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, Json(report)).into_response()
}
