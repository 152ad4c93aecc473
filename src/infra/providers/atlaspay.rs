//! AtlasPay provider adapter.
//!
//! AtlasPay speaks camelCase JSON with SCREAMING_SNAKE enum spellings and
//! authenticates with `X-Api-Key` / `X-Merchant-Id` headers. This adapter
//! owns the full mapping table between AtlasPay's wire vocabulary and the
//! internal model; unrecognized status strings fall back to a conservative
//! default instead of failing the call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{
    ConfigError, CreateCustomerRequest, CreatePayoutRequest, CreateQuoteRequest, Customer,
    CustomerType, FeeComponent, InitiateKybRequest, InitiateKycRequest, OperationResult,
    PaginationParams, Payout, PayoutParty, PayoutProvider, PayoutStatus, ProviderError,
    ProviderId, Quote, RiskLevel, SubmitVerificationRequest, UpdateCustomerRequest,
    UploadDocumentRequest, VerificationCheck, VerificationDocument, VerificationInfo,
    VerificationLevel, VerificationStatus,
};
use crate::infra::http::{ProviderHttpClient, ProviderSettings, decode_response};
use crate::infra::webhook::verify_signature;

/// Payout status strings AtlasPay is documented to emit
pub const KNOWN_PAYOUT_STATUSES: &[&str] = &[
    "CREATED",
    "AWAITING_DEPOSIT",
    "DEPOSIT_RECEIVED",
    "PROCESSING",
    "PAYMENT_SENT",
    "COMPLETED",
    "FAILED",
    "CANCELLED",
    "EXPIRED",
    "UNDER_REVIEW",
    "REFUNDED",
];

/// Verification status strings AtlasPay is documented to emit
pub const KNOWN_VERIFICATION_STATUSES: &[&str] = &[
    "NOT_STARTED",
    "PENDING",
    "IN_REVIEW",
    "ACTION_REQUIRED",
    "APPROVED",
    "REJECTED",
    "EXPIRED",
];

/// Map an AtlasPay payout status string, case-insensitively. Unknown values
/// fall back to `Created` rather than failing the call.
pub fn map_payout_status(s: &str) -> PayoutStatus {
    match s.to_ascii_uppercase().as_str() {
        "CREATED" => PayoutStatus::Created,
        "AWAITING_DEPOSIT" => PayoutStatus::AwaitingFunds,
        "DEPOSIT_RECEIVED" => PayoutStatus::FundsReceived,
        "PROCESSING" => PayoutStatus::Processing,
        "PAYMENT_SENT" => PayoutStatus::SentToBeneficiary,
        "COMPLETED" => PayoutStatus::Completed,
        "FAILED" => PayoutStatus::Failed,
        "CANCELLED" => PayoutStatus::Cancelled,
        "EXPIRED" => PayoutStatus::Expired,
        "UNDER_REVIEW" => PayoutStatus::PendingReview,
        "REFUNDED" => PayoutStatus::Refunded,
        other => {
            warn!(status = %other, "Unknown AtlasPay payout status, defaulting to created");
            PayoutStatus::Created
        }
    }
}

/// Map an AtlasPay verification status string, case-insensitively
pub fn map_verification_status(s: &str) -> VerificationStatus {
    match s.to_ascii_uppercase().as_str() {
        "NOT_STARTED" => VerificationStatus::NotStarted,
        "PENDING" => VerificationStatus::Pending,
        "IN_REVIEW" => VerificationStatus::InReview,
        "ACTION_REQUIRED" => VerificationStatus::AdditionalInfoRequired,
        "APPROVED" => VerificationStatus::Approved,
        "REJECTED" => VerificationStatus::Rejected,
        "EXPIRED" => VerificationStatus::Expired,
        other => {
            warn!(status = %other, "Unknown AtlasPay verification status, defaulting to not_started");
            VerificationStatus::NotStarted
        }
    }
}

/// Map an AtlasPay verification level string
pub fn map_verification_level(s: &str) -> VerificationLevel {
    match s.to_ascii_uppercase().as_str() {
        "STANDARD" => VerificationLevel::Standard,
        "ENHANCED" => VerificationLevel::Enhanced,
        _ => VerificationLevel::Basic,
    }
}

fn map_risk_level(s: &str) -> Option<RiskLevel> {
    match s.to_ascii_uppercase().as_str() {
        "LOW" => Some(RiskLevel::Low),
        "MEDIUM" => Some(RiskLevel::Medium),
        "HIGH" => Some(RiskLevel::High),
        _ => None,
    }
}

fn level_to_wire(level: VerificationLevel) -> &'static str {
    match level {
        VerificationLevel::Basic => "BASIC",
        VerificationLevel::Standard => "STANDARD",
        VerificationLevel::Enhanced => "ENHANCED",
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasCustomer {
    id: String,
    #[serde(default)]
    customer_type: Option<String>,
    full_name: String,
    email: String,
    country: String,
    #[serde(default)]
    verification_status: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct AtlasCustomerList {
    data: Vec<AtlasCustomer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasCheck {
    name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasDocument {
    id: String,
    #[serde(rename = "type")]
    document_type: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct AtlasDocumentList {
    data: Vec<AtlasDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasVerification {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    kyc_complete: bool,
    #[serde(default)]
    kyb_complete: bool,
    #[serde(default)]
    checks: Vec<AtlasCheck>,
    #[serde(default)]
    documents: Vec<AtlasDocument>,
    #[serde(default)]
    risk_score: Option<i32>,
    #[serde(default)]
    risk_level: Option<String>,
    #[serde(default)]
    submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasFee {
    name: String,
    amount: Decimal,
    currency: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasQuote {
    id: String,
    source_currency: String,
    target_currency: String,
    source_amount: Decimal,
    target_amount: Decimal,
    exchange_rate: Decimal,
    fee_amount: Decimal,
    #[serde(default)]
    fee_breakdown: Vec<AtlasFee>,
    #[serde(default)]
    network: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasParty {
    #[serde(default)]
    name: String,
    #[serde(default)]
    account_number: Option<String>,
    #[serde(default)]
    bank_name: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasOrder {
    id: String,
    #[serde(default)]
    external_id: Option<String>,
    status: String,
    source_currency: String,
    source_amount: Decimal,
    target_currency: String,
    target_amount: Decimal,
    exchange_rate: Decimal,
    fee_amount: Decimal,
    #[serde(default)]
    network: Option<String>,
    #[serde(default)]
    sender: AtlasParty,
    #[serde(default)]
    beneficiary: AtlasParty,
    #[serde(default)]
    deposit_wallet: Option<String>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    blockchain_tx_hash: Option<String>,
    #[serde(default)]
    bank_reference: Option<String>,
    #[serde(default)]
    failure_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct AtlasOrderList {
    data: Vec<AtlasOrder>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasOrderStatus {
    status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AtlasCreateCustomer<'a> {
    customer_type: &'static str,
    full_name: &'a str,
    email: &'a str,
    country: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AtlasUpdateCustomer<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AtlasKycSession<'a> {
    customer_id: &'a str,
    level: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AtlasKybSession<'a> {
    customer_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    registration_number: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AtlasUploadDocument<'a> {
    customer_id: &'a str,
    #[serde(rename = "type")]
    document_type: &'a str,
    file_url: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AtlasSubmitVerification<'a> {
    customer_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AtlasCreateQuote<'a> {
    source_currency: &'a str,
    target_currency: &'a str,
    source_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AtlasCreateOrderParty<'a> {
    name: &'a str,
    account_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bank_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AtlasCreateOrder<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    quote_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<&'a str>,
    customer_id: &'a str,
    source_currency: &'a str,
    target_currency: &'a str,
    source_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<&'a str>,
    beneficiary: AtlasCreateOrderParty<'a>,
}

// ============================================================================
// ADAPTER
// ============================================================================

/// AtlasPay implementation of the common provider contract
pub struct AtlasPayAdapter {
    http: ProviderHttpClient,
    webhook_secret: Option<SecretString>,
}

impl AtlasPayAdapter {
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Api-Key",
            HeaderValue::from_str(settings.api_key.expose_secret()).map_err(|_| {
                ConfigError::Invalid {
                    key: "ATLASPAY_API_KEY".to_string(),
                    message: "not a valid header value".to_string(),
                }
            })?,
        );
        headers.insert(
            "X-Merchant-Id",
            HeaderValue::from_str(&settings.client_id).map_err(|_| ConfigError::Invalid {
                key: "ATLASPAY_MERCHANT_ID".to_string(),
                message: "not a valid header value".to_string(),
            })?,
        );

        let http = ProviderHttpClient::new(
            &settings.base_url,
            settings.timeout_secs,
            settings.retry_count,
            headers,
        )?;

        Ok(Self {
            http,
            webhook_secret: settings.webhook_secret.clone(),
        })
    }

    fn map_customer(&self, wire: AtlasCustomer) -> Customer {
        Customer {
            id: wire.id,
            customer_type: match wire.customer_type.as_deref() {
                Some(t) if t.eq_ignore_ascii_case("BUSINESS") => CustomerType::Business,
                _ => CustomerType::Individual,
            },
            full_name: wire.full_name,
            email: wire.email,
            country: wire.country,
            verification_status: wire
                .verification_status
                .as_deref()
                .map(map_verification_status)
                .unwrap_or_default(),
            provider: ProviderId::AtlasPay,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }

    fn map_verification(&self, wire: AtlasVerification) -> VerificationInfo {
        VerificationInfo {
            status: wire
                .status
                .as_deref()
                .map(map_verification_status)
                .unwrap_or_default(),
            level: wire
                .level
                .as_deref()
                .map(map_verification_level)
                .unwrap_or_default(),
            kyc_completed: wire.kyc_complete,
            kyb_completed: wire.kyb_complete,
            checks: wire
                .checks
                .into_iter()
                .map(|c| VerificationCheck {
                    name: c.name,
                    status: c
                        .status
                        .as_deref()
                        .map(map_verification_status)
                        .unwrap_or_default(),
                    message: c.detail,
                })
                .collect(),
            documents: wire
                .documents
                .into_iter()
                .map(|d| self.map_document(d))
                .collect(),
            risk_score: wire.risk_score,
            risk_level: wire.risk_level.as_deref().and_then(map_risk_level),
            submitted_at: wire.submitted_at,
            completed_at: wire.completed_at,
            expires_at: wire.expires_at,
        }
    }

    fn map_document(&self, wire: AtlasDocument) -> VerificationDocument {
        VerificationDocument {
            id: wire.id,
            document_type: wire.document_type,
            status: wire
                .status
                .as_deref()
                .map(map_verification_status)
                .unwrap_or_default(),
            uploaded_at: wire.uploaded_at,
        }
    }

    fn map_quote(&self, wire: AtlasQuote) -> Quote {
        Quote {
            id: wire.id,
            source_currency: wire.source_currency,
            target_currency: wire.target_currency,
            source_amount: wire.source_amount,
            target_amount: wire.target_amount,
            exchange_rate: wire.exchange_rate,
            fee_amount: wire.fee_amount,
            fee_breakdown: wire
                .fee_breakdown
                .into_iter()
                .map(|f| FeeComponent {
                    name: f.name,
                    amount: f.amount,
                    currency: f.currency,
                })
                .collect(),
            network: wire.network,
            provider: ProviderId::AtlasPay,
            created_at: wire.created_at,
            expires_at: wire.expires_at,
        }
    }

    fn map_party(&self, wire: AtlasParty) -> PayoutParty {
        PayoutParty {
            name: wire.name,
            account_reference: wire.account_number,
            bank_name: wire.bank_name,
            country: wire.country,
        }
    }

    fn map_order(&self, wire: AtlasOrder) -> Payout {
        Payout {
            id: wire.id.clone(),
            external_id: wire.external_id,
            provider: ProviderId::AtlasPay,
            provider_order_id: wire.id,
            status: map_payout_status(&wire.status),
            source_currency: wire.source_currency,
            source_amount: wire.source_amount,
            target_currency: wire.target_currency,
            target_amount: wire.target_amount,
            exchange_rate: wire.exchange_rate,
            fee_amount: wire.fee_amount,
            network: wire.network,
            sender: self.map_party(wire.sender),
            beneficiary: self.map_party(wire.beneficiary),
            deposit_wallet: wire.deposit_wallet,
            payment_method: wire.payment_method,
            blockchain_tx_hash: wire.blockchain_tx_hash,
            bank_reference: wire.bank_reference,
            failure_reason: wire.failure_reason,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            completed_at: wire.completed_at,
        }
    }

    fn list_query(params: &PaginationParams) -> String {
        match &params.cursor {
            Some(cursor) => format!("?limit={}&startingAfter={}", params.limit, cursor),
            None => format!("?limit={}", params.limit),
        }
    }
}

#[async_trait]
impl PayoutProvider for AtlasPayAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::AtlasPay
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        let resp = self.http.get("/v1/health").await?;
        if resp.is_success() {
            Ok(())
        } else {
            Err(ProviderError::Status {
                status: resp.status,
                body: resp.body,
            })
        }
    }

    async fn create_customer(&self, req: &CreateCustomerRequest) -> OperationResult<Customer> {
        let body = AtlasCreateCustomer {
            customer_type: match req.customer_type {
                CustomerType::Individual => "INDIVIDUAL",
                CustomerType::Business => "BUSINESS",
            },
            full_name: &req.full_name,
            email: &req.email,
            country: &req.country,
        };
        decode_response(
            self.http.post_json("/v1/customers", &body).await,
            "CUSTOMER_CREATE_FAILED",
            "create customer",
        )
        .map(|wire| self.map_customer(wire))
    }

    async fn get_customer(&self, customer_id: &str) -> OperationResult<Customer> {
        decode_response(
            self.http.get(&format!("/v1/customers/{customer_id}")).await,
            "CUSTOMER_GET_FAILED",
            "get customer",
        )
        .map(|wire| self.map_customer(wire))
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        req: &UpdateCustomerRequest,
    ) -> OperationResult<Customer> {
        let body = AtlasUpdateCustomer {
            full_name: req.full_name.as_deref(),
            email: req.email.as_deref(),
        };
        decode_response(
            self.http
                .patch_json(&format!("/v1/customers/{customer_id}"), &body)
                .await,
            "CUSTOMER_UPDATE_FAILED",
            "update customer",
        )
        .map(|wire| self.map_customer(wire))
    }

    async fn list_customers(&self, params: &PaginationParams) -> OperationResult<Vec<Customer>> {
        decode_response::<AtlasCustomerList>(
            self.http
                .get(&format!("/v1/customers{}", Self::list_query(params)))
                .await,
            "CUSTOMER_LIST_FAILED",
            "list customers",
        )
        .map(|wire| wire.data.into_iter().map(|c| self.map_customer(c)).collect())
    }

    async fn initiate_kyc(&self, req: &InitiateKycRequest) -> OperationResult<VerificationInfo> {
        let body = AtlasKycSession {
            customer_id: &req.customer_id,
            level: level_to_wire(req.level),
            redirect_url: req.redirect_url.as_deref(),
        };
        decode_response(
            self.http.post_json("/v1/kyc/sessions", &body).await,
            "KYC_INITIATE_FAILED",
            "initiate kyc",
        )
        .map(|wire| self.map_verification(wire))
    }

    async fn kyc_status(&self, customer_id: &str) -> OperationResult<VerificationInfo> {
        decode_response(
            self.http
                .get(&format!("/v1/customers/{customer_id}/verification"))
                .await,
            "KYC_STATUS_FAILED",
            "kyc status",
        )
        .map(|wire| self.map_verification(wire))
    }

    async fn initiate_kyb(&self, req: &InitiateKybRequest) -> OperationResult<VerificationInfo> {
        let body = AtlasKybSession {
            customer_id: &req.customer_id,
            company_name: req.company_name.as_deref(),
            registration_number: req.registration_number.as_deref(),
        };
        decode_response(
            self.http.post_json("/v1/kyb/sessions", &body).await,
            "KYB_INITIATE_FAILED",
            "initiate kyb",
        )
        .map(|wire| self.map_verification(wire))
    }

    async fn kyb_status(&self, customer_id: &str) -> OperationResult<VerificationInfo> {
        decode_response(
            self.http
                .get(&format!("/v1/customers/{customer_id}/verification"))
                .await,
            "KYB_STATUS_FAILED",
            "kyb status",
        )
        .map(|wire| self.map_verification(wire))
    }

    async fn upload_document(
        &self,
        req: &UploadDocumentRequest,
    ) -> OperationResult<VerificationDocument> {
        let body = AtlasUploadDocument {
            customer_id: &req.customer_id,
            document_type: &req.document_type,
            file_url: &req.file_url,
        };
        decode_response(
            self.http.post_json("/v1/documents", &body).await,
            "DOCUMENT_UPLOAD_FAILED",
            "upload document",
        )
        .map(|wire| self.map_document(wire))
    }

    async fn get_documents(
        &self,
        customer_id: &str,
    ) -> OperationResult<Vec<VerificationDocument>> {
        decode_response::<AtlasDocumentList>(
            self.http
                .get(&format!("/v1/customers/{customer_id}/documents"))
                .await,
            "DOCUMENT_LIST_FAILED",
            "get documents",
        )
        .map(|wire| wire.data.into_iter().map(|d| self.map_document(d)).collect())
    }

    async fn submit_verification(
        &self,
        req: &SubmitVerificationRequest,
    ) -> OperationResult<VerificationInfo> {
        let body = AtlasSubmitVerification {
            customer_id: &req.customer_id,
        };
        decode_response(
            self.http.post_json("/v1/verification/submit", &body).await,
            "VERIFICATION_SUBMIT_FAILED",
            "submit verification",
        )
        .map(|wire| self.map_verification(wire))
    }

    async fn create_quote(&self, req: &CreateQuoteRequest) -> OperationResult<Quote> {
        let body = AtlasCreateQuote {
            source_currency: &req.source_currency,
            target_currency: &req.target_currency,
            source_amount: req.source_amount,
            network: req.network.as_deref(),
        };
        decode_response(
            self.http.post_json("/v1/quotes", &body).await,
            "QUOTE_CREATE_FAILED",
            "create quote",
        )
        .map(|wire| self.map_quote(wire))
    }

    async fn get_quote(&self, quote_id: &str) -> OperationResult<Quote> {
        decode_response(
            self.http.get(&format!("/v1/quotes/{quote_id}")).await,
            "QUOTE_GET_FAILED",
            "get quote",
        )
        .map(|wire| self.map_quote(wire))
    }

    async fn create_payout(&self, req: &CreatePayoutRequest) -> OperationResult<Payout> {
        let body = AtlasCreateOrder {
            quote_id: req.quote_id.as_deref(),
            external_id: req.external_id.as_deref(),
            customer_id: &req.customer_id,
            source_currency: &req.source_currency,
            target_currency: &req.target_currency,
            source_amount: req.source_amount,
            network: req.network.as_deref(),
            beneficiary: AtlasCreateOrderParty {
                name: &req.beneficiary.name,
                account_number: &req.beneficiary.account_reference,
                bank_name: req.beneficiary.bank_name.as_deref(),
                country: req.beneficiary.country.as_deref(),
            },
        };
        decode_response(
            self.http.post_json("/v1/orders", &body).await,
            "PAYOUT_CREATE_FAILED",
            "create payout",
        )
        .map(|wire| self.map_order(wire))
    }

    async fn get_payout(&self, payout_id: &str) -> OperationResult<Payout> {
        decode_response(
            self.http.get(&format!("/v1/orders/{payout_id}")).await,
            "PAYOUT_GET_FAILED",
            "get payout",
        )
        .map(|wire| self.map_order(wire))
    }

    async fn payout_status(&self, payout_id: &str) -> OperationResult<PayoutStatus> {
        decode_response::<AtlasOrderStatus>(
            self.http
                .get(&format!("/v1/orders/{payout_id}/status"))
                .await,
            "PAYOUT_STATUS_FAILED",
            "payout status",
        )
        .map(|wire| map_payout_status(&wire.status))
    }

    async fn cancel_payout(&self, payout_id: &str) -> OperationResult<Payout> {
        decode_response(
            self.http
                .post_json(&format!("/v1/orders/{payout_id}/cancel"), &serde_json::json!({}))
                .await,
            "PAYOUT_CANCEL_FAILED",
            "cancel payout",
        )
        .map(|wire| self.map_order(wire))
    }

    async fn list_payouts(&self, params: &PaginationParams) -> OperationResult<Vec<Payout>> {
        decode_response::<AtlasOrderList>(
            self.http
                .get(&format!("/v1/orders{}", Self::list_query(params)))
                .await,
            "PAYOUT_LIST_FAILED",
            "list payouts",
        )
        .map(|wire| wire.data.into_iter().map(|o| self.map_order(o)).collect())
    }

    fn validate_webhook(&self, payload: &[u8], signature: &str) -> bool {
        match &self.webhook_secret {
            Some(secret) => verify_signature(secret.expose_secret().as_bytes(), payload, signature),
            None => {
                warn!("AtlasPay webhook secret not configured, skipping signature validation");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_status_mapping_known_vocabulary() {
        // Every documented status maps without hitting the fallback
        for status in KNOWN_PAYOUT_STATUSES {
            let mapped = map_payout_status(status);
            if *status != "CREATED" {
                assert_ne!(
                    mapped,
                    PayoutStatus::Created,
                    "{status} should map to a specific status"
                );
            }
        }
        assert_eq!(map_payout_status("PAYMENT_SENT"), PayoutStatus::SentToBeneficiary);
        assert_eq!(map_payout_status("UNDER_REVIEW"), PayoutStatus::PendingReview);
    }

    #[test]
    fn test_payout_status_mapping_case_insensitive() {
        assert_eq!(map_payout_status("completed"), PayoutStatus::Completed);
        assert_eq!(map_payout_status("Awaiting_Deposit"), PayoutStatus::AwaitingFunds);
    }

    #[test]
    fn test_payout_status_mapping_unknown_falls_back() {
        assert_eq!(map_payout_status("SOMETHING_NEW"), PayoutStatus::Created);
        assert_eq!(map_payout_status(""), PayoutStatus::Created);
    }

    #[test]
    fn test_verification_status_mapping() {
        for status in KNOWN_VERIFICATION_STATUSES {
            if *status != "NOT_STARTED" {
                assert_ne!(
                    map_verification_status(status),
                    VerificationStatus::NotStarted,
                    "{status} should map to a specific status"
                );
            }
        }
        assert_eq!(
            map_verification_status("ACTION_REQUIRED"),
            VerificationStatus::AdditionalInfoRequired
        );
        assert_eq!(
            map_verification_status("approved"),
            VerificationStatus::Approved
        );
        assert_eq!(
            map_verification_status("mystery"),
            VerificationStatus::NotStarted
        );
    }

    #[test]
    fn test_verification_level_mapping() {
        assert_eq!(map_verification_level("ENHANCED"), VerificationLevel::Enhanced);
        assert_eq!(map_verification_level("standard"), VerificationLevel::Standard);
        assert_eq!(map_verification_level("whatever"), VerificationLevel::Basic);
    }

    #[test]
    fn test_order_wire_decoding_and_mapping() {
        let json = r#"{
            "id": "ord_1",
            "externalId": "ext_9",
            "status": "AWAITING_DEPOSIT",
            "sourceCurrency": "USDC",
            "sourceAmount": "100.00",
            "targetCurrency": "NGN",
            "targetAmount": "155000.00",
            "exchangeRate": "1550",
            "feeAmount": "1.00",
            "network": "polygon",
            "beneficiary": {"name": "Ada", "accountNumber": "0123", "country": "NG"},
            "depositWallet": "0xabc",
            "createdAt": "2026-08-01T10:00:00Z",
            "updatedAt": "2026-08-01T10:00:00Z"
        }"#;
        let wire: AtlasOrder = serde_json::from_str(json).unwrap();
        assert_eq!(wire.status, "AWAITING_DEPOSIT");
        assert_eq!(map_payout_status(&wire.status), PayoutStatus::AwaitingFunds);
        assert_eq!(wire.beneficiary.account_number.as_deref(), Some("0123"));
    }
}
