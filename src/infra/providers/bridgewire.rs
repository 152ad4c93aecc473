//! BridgeWire provider adapter.
//!
//! BridgeWire speaks snake_case JSON with lowercase enum spellings,
//! authenticates with a bearer token plus `X-Client-Id`, and calls payouts
//! "transfers". Its verification tiers ("tier1".."tier3") and status words
//! differ entirely from the internal model, so the mapping tables here are
//! the whole point of the adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
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

/// Transfer state strings BridgeWire is documented to emit
pub const KNOWN_TRANSFER_STATES: &[&str] = &[
    "initiated",
    "pending_funds",
    "funds_confirmed",
    "converting",
    "disbursed",
    "settled",
    "failed",
    "canceled",
    "expired",
    "compliance_hold",
    "refunded",
];

/// Verification state strings BridgeWire is documented to emit
pub const KNOWN_VERIFICATION_STATES: &[&str] = &[
    "none",
    "awaiting_input",
    "under_review",
    "needs_more_info",
    "verified",
    "declined",
    "lapsed",
];

/// Map a BridgeWire transfer state, case-insensitively. Unknown values fall
/// back to `Created` rather than failing the call.
pub fn map_transfer_state(s: &str) -> PayoutStatus {
    match s.to_ascii_lowercase().as_str() {
        "initiated" => PayoutStatus::Created,
        "pending_funds" => PayoutStatus::AwaitingFunds,
        "funds_confirmed" => PayoutStatus::FundsReceived,
        "converting" => PayoutStatus::Processing,
        "disbursed" => PayoutStatus::SentToBeneficiary,
        "settled" => PayoutStatus::Completed,
        "failed" => PayoutStatus::Failed,
        "canceled" => PayoutStatus::Cancelled,
        "expired" => PayoutStatus::Expired,
        "compliance_hold" => PayoutStatus::PendingReview,
        "refunded" => PayoutStatus::Refunded,
        other => {
            warn!(state = %other, "Unknown BridgeWire transfer state, defaulting to created");
            PayoutStatus::Created
        }
    }
}

/// Map a BridgeWire verification state, case-insensitively
pub fn map_verification_state(s: &str) -> VerificationStatus {
    match s.to_ascii_lowercase().as_str() {
        "none" => VerificationStatus::NotStarted,
        "awaiting_input" => VerificationStatus::Pending,
        "under_review" => VerificationStatus::InReview,
        "needs_more_info" => VerificationStatus::AdditionalInfoRequired,
        "verified" => VerificationStatus::Approved,
        "declined" => VerificationStatus::Rejected,
        "lapsed" => VerificationStatus::Expired,
        other => {
            warn!(state = %other, "Unknown BridgeWire verification state, defaulting to not_started");
            VerificationStatus::NotStarted
        }
    }
}

/// Map a BridgeWire verification tier
pub fn map_tier(s: &str) -> VerificationLevel {
    match s.to_ascii_lowercase().as_str() {
        "tier2" => VerificationLevel::Standard,
        "tier3" => VerificationLevel::Enhanced,
        _ => VerificationLevel::Basic,
    }
}

fn tier_to_wire(level: VerificationLevel) -> &'static str {
    match level {
        VerificationLevel::Basic => "tier1",
        VerificationLevel::Standard => "tier2",
        VerificationLevel::Enhanced => "tier3",
    }
}

fn map_risk(s: &str) -> Option<RiskLevel> {
    match s.to_ascii_lowercase().as_str() {
        "low" => Some(RiskLevel::Low),
        "medium" => Some(RiskLevel::Medium),
        "high" => Some(RiskLevel::High),
        _ => None,
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct BwAccount {
    id: String,
    #[serde(default)]
    kind: Option<String>,
    legal_name: String,
    email: String,
    country_code: String,
    #[serde(default)]
    verification_state: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct BwAccountList {
    items: Vec<BwAccount>,
}

#[derive(Debug, Deserialize)]
struct BwCheck {
    check_type: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BwDocument {
    id: String,
    doc_type: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct BwDocumentList {
    items: Vec<BwDocument>,
}

#[derive(Debug, Deserialize)]
struct BwVerification {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    tier: Option<String>,
    #[serde(default)]
    individual_verified: bool,
    #[serde(default)]
    business_verified: bool,
    #[serde(default)]
    checks: Vec<BwCheck>,
    #[serde(default)]
    documents: Vec<BwDocument>,
    #[serde(default)]
    risk_score: Option<i32>,
    #[serde(default)]
    risk_band: Option<String>,
    #[serde(default)]
    submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    valid_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct BwFeeLine {
    label: String,
    amount: Decimal,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct BwRate {
    id: String,
    sell_currency: String,
    buy_currency: String,
    sell_amount: Decimal,
    buy_amount: Decimal,
    rate: Decimal,
    total_fees: Decimal,
    #[serde(default)]
    fee_lines: Vec<BwFeeLine>,
    #[serde(default)]
    chain: Option<String>,
    created_at: DateTime<Utc>,
    valid_until: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
struct BwCounterparty {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    account_identifier: Option<String>,
    #[serde(default)]
    institution: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BwTransfer {
    id: String,
    #[serde(default)]
    reference: Option<String>,
    state: String,
    sell_currency: String,
    sell_amount: Decimal,
    buy_currency: String,
    buy_amount: Decimal,
    rate: Decimal,
    total_fees: Decimal,
    #[serde(default)]
    chain: Option<String>,
    #[serde(default)]
    originator: BwCounterparty,
    #[serde(default)]
    recipient: BwCounterparty,
    #[serde(default)]
    funding_address: Option<String>,
    #[serde(default)]
    disbursement_method: Option<String>,
    #[serde(default)]
    chain_tx_id: Option<String>,
    #[serde(default)]
    bank_trace_id: Option<String>,
    #[serde(default)]
    failure_detail: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    settled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct BwTransferList {
    items: Vec<BwTransfer>,
}

#[derive(Debug, Deserialize)]
struct BwTransferState {
    state: String,
}

#[derive(Debug, Serialize)]
struct BwCreateAccount<'a> {
    kind: &'static str,
    legal_name: &'a str,
    email: &'a str,
    country_code: &'a str,
}

#[derive(Debug, Serialize)]
struct BwUpdateAccount<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct BwStartVerification<'a> {
    account_id: &'a str,
    tier: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct BwStartBusinessVerification<'a> {
    account_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    registration_number: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct BwUploadDocument<'a> {
    account_id: &'a str,
    doc_type: &'a str,
    source_url: &'a str,
}

#[derive(Debug, Serialize)]
struct BwFinalizeVerification<'a> {
    account_id: &'a str,
}

#[derive(Debug, Serialize)]
struct BwCreateRate<'a> {
    sell_currency: &'a str,
    buy_currency: &'a str,
    sell_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    chain: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct BwCreateRecipient<'a> {
    full_name: &'a str,
    account_identifier: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    institution: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_code: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct BwCreateTransfer<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
    account_id: &'a str,
    sell_currency: &'a str,
    buy_currency: &'a str,
    sell_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    chain: Option<&'a str>,
    recipient: BwCreateRecipient<'a>,
}

// ============================================================================
// ADAPTER
// ============================================================================

/// BridgeWire implementation of the common provider contract
pub struct BridgeWireAdapter {
    http: ProviderHttpClient,
    webhook_secret: Option<SecretString>,
}

impl BridgeWireAdapter {
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", settings.api_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).map_err(|_| ConfigError::Invalid {
                key: "BRIDGEWIRE_API_KEY".to_string(),
                message: "not a valid header value".to_string(),
            })?,
        );
        headers.insert(
            "X-Client-Id",
            HeaderValue::from_str(&settings.client_id).map_err(|_| ConfigError::Invalid {
                key: "BRIDGEWIRE_CLIENT_ID".to_string(),
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

    fn map_account(&self, wire: BwAccount) -> Customer {
        Customer {
            id: wire.id,
            customer_type: match wire.kind.as_deref() {
                Some(k) if k.eq_ignore_ascii_case("business") => CustomerType::Business,
                _ => CustomerType::Individual,
            },
            full_name: wire.legal_name,
            email: wire.email,
            country: wire.country_code,
            verification_status: wire
                .verification_state
                .as_deref()
                .map(map_verification_state)
                .unwrap_or_default(),
            provider: ProviderId::BridgeWire,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }

    fn map_verification(&self, wire: BwVerification) -> VerificationInfo {
        VerificationInfo {
            status: wire
                .state
                .as_deref()
                .map(map_verification_state)
                .unwrap_or_default(),
            level: wire.tier.as_deref().map(map_tier).unwrap_or_default(),
            kyc_completed: wire.individual_verified,
            kyb_completed: wire.business_verified,
            checks: wire
                .checks
                .into_iter()
                .map(|c| VerificationCheck {
                    name: c.check_type,
                    status: c
                        .state
                        .as_deref()
                        .map(map_verification_state)
                        .unwrap_or_default(),
                    message: c.notes,
                })
                .collect(),
            documents: wire
                .documents
                .into_iter()
                .map(|d| self.map_document(d))
                .collect(),
            risk_score: wire.risk_score,
            risk_level: wire.risk_band.as_deref().and_then(map_risk),
            submitted_at: wire.submitted_at,
            completed_at: wire.resolved_at,
            expires_at: wire.valid_until,
        }
    }

    fn map_document(&self, wire: BwDocument) -> VerificationDocument {
        VerificationDocument {
            id: wire.id,
            document_type: wire.doc_type,
            status: wire
                .state
                .as_deref()
                .map(map_verification_state)
                .unwrap_or_default(),
            uploaded_at: wire.uploaded_at,
        }
    }

    fn map_rate(&self, wire: BwRate) -> Quote {
        Quote {
            id: wire.id,
            source_currency: wire.sell_currency,
            target_currency: wire.buy_currency,
            source_amount: wire.sell_amount,
            target_amount: wire.buy_amount,
            exchange_rate: wire.rate,
            fee_amount: wire.total_fees,
            fee_breakdown: wire
                .fee_lines
                .into_iter()
                .map(|f| FeeComponent {
                    name: f.label,
                    amount: f.amount,
                    currency: f.currency,
                })
                .collect(),
            network: wire.chain,
            provider: ProviderId::BridgeWire,
            created_at: wire.created_at,
            expires_at: wire.valid_until,
        }
    }

    fn map_counterparty(&self, wire: BwCounterparty) -> PayoutParty {
        PayoutParty {
            name: wire.full_name,
            account_reference: wire.account_identifier,
            bank_name: wire.institution,
            country: wire.country_code,
        }
    }

    fn map_transfer(&self, wire: BwTransfer) -> Payout {
        Payout {
            id: wire.id.clone(),
            external_id: wire.reference,
            provider: ProviderId::BridgeWire,
            provider_order_id: wire.id,
            status: map_transfer_state(&wire.state),
            source_currency: wire.sell_currency,
            source_amount: wire.sell_amount,
            target_currency: wire.buy_currency,
            target_amount: wire.buy_amount,
            exchange_rate: wire.rate,
            fee_amount: wire.total_fees,
            network: wire.chain,
            sender: self.map_counterparty(wire.originator),
            beneficiary: self.map_counterparty(wire.recipient),
            deposit_wallet: wire.funding_address,
            payment_method: wire.disbursement_method,
            blockchain_tx_hash: wire.chain_tx_id,
            bank_reference: wire.bank_trace_id,
            failure_reason: wire.failure_detail,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            completed_at: wire.settled_at,
        }
    }

    fn list_query(params: &PaginationParams) -> String {
        match &params.cursor {
            Some(cursor) => format!("?page_size={}&after={}", params.limit, cursor),
            None => format!("?page_size={}", params.limit),
        }
    }
}

#[async_trait]
impl PayoutProvider for BridgeWireAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::BridgeWire
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        let resp = self.http.get("/api/v1/ping").await?;
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
        let body = BwCreateAccount {
            kind: match req.customer_type {
                CustomerType::Individual => "individual",
                CustomerType::Business => "business",
            },
            legal_name: &req.full_name,
            email: &req.email,
            country_code: &req.country,
        };
        decode_response(
            self.http.post_json("/api/v1/accounts", &body).await,
            "CUSTOMER_CREATE_FAILED",
            "create customer",
        )
        .map(|wire| self.map_account(wire))
    }

    async fn get_customer(&self, customer_id: &str) -> OperationResult<Customer> {
        decode_response(
            self.http
                .get(&format!("/api/v1/accounts/{customer_id}"))
                .await,
            "CUSTOMER_GET_FAILED",
            "get customer",
        )
        .map(|wire| self.map_account(wire))
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        req: &UpdateCustomerRequest,
    ) -> OperationResult<Customer> {
        let body = BwUpdateAccount {
            legal_name: req.full_name.as_deref(),
            email: req.email.as_deref(),
        };
        decode_response(
            self.http
                .put_json(&format!("/api/v1/accounts/{customer_id}"), &body)
                .await,
            "CUSTOMER_UPDATE_FAILED",
            "update customer",
        )
        .map(|wire| self.map_account(wire))
    }

    async fn list_customers(&self, params: &PaginationParams) -> OperationResult<Vec<Customer>> {
        decode_response::<BwAccountList>(
            self.http
                .get(&format!("/api/v1/accounts{}", Self::list_query(params)))
                .await,
            "CUSTOMER_LIST_FAILED",
            "list customers",
        )
        .map(|wire| wire.items.into_iter().map(|a| self.map_account(a)).collect())
    }

    async fn initiate_kyc(&self, req: &InitiateKycRequest) -> OperationResult<VerificationInfo> {
        let body = BwStartVerification {
            account_id: &req.customer_id,
            tier: tier_to_wire(req.level),
            return_url: req.redirect_url.as_deref(),
        };
        decode_response(
            self.http.post_json("/api/v1/verifications", &body).await,
            "KYC_INITIATE_FAILED",
            "initiate kyc",
        )
        .map(|wire| self.map_verification(wire))
    }

    async fn kyc_status(&self, customer_id: &str) -> OperationResult<VerificationInfo> {
        decode_response(
            self.http
                .get(&format!("/api/v1/accounts/{customer_id}/verification"))
                .await,
            "KYC_STATUS_FAILED",
            "kyc status",
        )
        .map(|wire| self.map_verification(wire))
    }

    async fn initiate_kyb(&self, req: &InitiateKybRequest) -> OperationResult<VerificationInfo> {
        let body = BwStartBusinessVerification {
            account_id: &req.customer_id,
            company_name: req.company_name.as_deref(),
            registration_number: req.registration_number.as_deref(),
        };
        decode_response(
            self.http
                .post_json("/api/v1/verifications/business", &body)
                .await,
            "KYB_INITIATE_FAILED",
            "initiate kyb",
        )
        .map(|wire| self.map_verification(wire))
    }

    async fn kyb_status(&self, customer_id: &str) -> OperationResult<VerificationInfo> {
        decode_response(
            self.http
                .get(&format!("/api/v1/accounts/{customer_id}/verification"))
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
        let body = BwUploadDocument {
            account_id: &req.customer_id,
            doc_type: &req.document_type,
            source_url: &req.file_url,
        };
        decode_response(
            self.http.post_json("/api/v1/documents", &body).await,
            "DOCUMENT_UPLOAD_FAILED",
            "upload document",
        )
        .map(|wire| self.map_document(wire))
    }

    async fn get_documents(
        &self,
        customer_id: &str,
    ) -> OperationResult<Vec<VerificationDocument>> {
        decode_response::<BwDocumentList>(
            self.http
                .get(&format!("/api/v1/accounts/{customer_id}/documents"))
                .await,
            "DOCUMENT_LIST_FAILED",
            "get documents",
        )
        .map(|wire| wire.items.into_iter().map(|d| self.map_document(d)).collect())
    }

    async fn submit_verification(
        &self,
        req: &SubmitVerificationRequest,
    ) -> OperationResult<VerificationInfo> {
        let body = BwFinalizeVerification {
            account_id: &req.customer_id,
        };
        decode_response(
            self.http
                .post_json("/api/v1/verifications/submit", &body)
                .await,
            "VERIFICATION_SUBMIT_FAILED",
            "submit verification",
        )
        .map(|wire| self.map_verification(wire))
    }

    async fn create_quote(&self, req: &CreateQuoteRequest) -> OperationResult<Quote> {
        let body = BwCreateRate {
            sell_currency: &req.source_currency,
            buy_currency: &req.target_currency,
            sell_amount: req.source_amount,
            chain: req.network.as_deref(),
        };
        decode_response(
            self.http.post_json("/api/v1/rates", &body).await,
            "QUOTE_CREATE_FAILED",
            "create quote",
        )
        .map(|wire| self.map_rate(wire))
    }

    async fn get_quote(&self, quote_id: &str) -> OperationResult<Quote> {
        decode_response(
            self.http.get(&format!("/api/v1/rates/{quote_id}")).await,
            "QUOTE_GET_FAILED",
            "get quote",
        )
        .map(|wire| self.map_rate(wire))
    }

    async fn create_payout(&self, req: &CreatePayoutRequest) -> OperationResult<Payout> {
        let body = BwCreateTransfer {
            rate_id: req.quote_id.as_deref(),
            reference: req.external_id.as_deref(),
            account_id: &req.customer_id,
            sell_currency: &req.source_currency,
            buy_currency: &req.target_currency,
            sell_amount: req.source_amount,
            chain: req.network.as_deref(),
            recipient: BwCreateRecipient {
                full_name: &req.beneficiary.name,
                account_identifier: &req.beneficiary.account_reference,
                institution: req.beneficiary.bank_name.as_deref(),
                country_code: req.beneficiary.country.as_deref(),
            },
        };
        decode_response(
            self.http.post_json("/api/v1/transfers", &body).await,
            "PAYOUT_CREATE_FAILED",
            "create payout",
        )
        .map(|wire| self.map_transfer(wire))
    }

    async fn get_payout(&self, payout_id: &str) -> OperationResult<Payout> {
        decode_response(
            self.http
                .get(&format!("/api/v1/transfers/{payout_id}"))
                .await,
            "PAYOUT_GET_FAILED",
            "get payout",
        )
        .map(|wire| self.map_transfer(wire))
    }

    async fn payout_status(&self, payout_id: &str) -> OperationResult<PayoutStatus> {
        decode_response::<BwTransferState>(
            self.http
                .get(&format!("/api/v1/transfers/{payout_id}/state"))
                .await,
            "PAYOUT_STATUS_FAILED",
            "payout status",
        )
        .map(|wire| map_transfer_state(&wire.state))
    }

    async fn cancel_payout(&self, payout_id: &str) -> OperationResult<Payout> {
        decode_response(
            self.http
                .post_json(
                    &format!("/api/v1/transfers/{payout_id}/cancel"),
                    &serde_json::json!({}),
                )
                .await,
            "PAYOUT_CANCEL_FAILED",
            "cancel payout",
        )
        .map(|wire| self.map_transfer(wire))
    }

    async fn list_payouts(&self, params: &PaginationParams) -> OperationResult<Vec<Payout>> {
        decode_response::<BwTransferList>(
            self.http
                .get(&format!("/api/v1/transfers{}", Self::list_query(params)))
                .await,
            "PAYOUT_LIST_FAILED",
            "list payouts",
        )
        .map(|wire| {
            wire.items
                .into_iter()
                .map(|t| self.map_transfer(t))
                .collect()
        })
    }

    fn validate_webhook(&self, payload: &[u8], signature: &str) -> bool {
        match &self.webhook_secret {
            Some(secret) => verify_signature(secret.expose_secret().as_bytes(), payload, signature),
            None => {
                warn!("BridgeWire webhook secret not configured, skipping signature validation");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_state_mapping_known_vocabulary() {
        for state in KNOWN_TRANSFER_STATES {
            let mapped = map_transfer_state(state);
            if *state != "initiated" {
                assert_ne!(
                    mapped,
                    PayoutStatus::Created,
                    "{state} should map to a specific status"
                );
            }
        }
        assert_eq!(map_transfer_state("disbursed"), PayoutStatus::SentToBeneficiary);
        assert_eq!(map_transfer_state("compliance_hold"), PayoutStatus::PendingReview);
        assert_eq!(map_transfer_state("canceled"), PayoutStatus::Cancelled);
    }

    #[test]
    fn test_transfer_state_mapping_case_insensitive() {
        assert_eq!(map_transfer_state("SETTLED"), PayoutStatus::Completed);
        assert_eq!(map_transfer_state("Pending_Funds"), PayoutStatus::AwaitingFunds);
    }

    #[test]
    fn test_transfer_state_mapping_unknown_falls_back() {
        assert_eq!(map_transfer_state("brand_new_state"), PayoutStatus::Created);
        assert_eq!(map_transfer_state(""), PayoutStatus::Created);
    }

    #[test]
    fn test_verification_state_mapping() {
        for state in KNOWN_VERIFICATION_STATES {
            if *state != "none" {
                assert_ne!(
                    map_verification_state(state),
                    VerificationStatus::NotStarted,
                    "{state} should map to a specific status"
                );
            }
        }
        assert_eq!(
            map_verification_state("needs_more_info"),
            VerificationStatus::AdditionalInfoRequired
        );
        assert_eq!(map_verification_state("VERIFIED"), VerificationStatus::Approved);
        assert_eq!(map_verification_state("???"), VerificationStatus::NotStarted);
    }

    #[test]
    fn test_tier_mapping() {
        assert_eq!(map_tier("tier1"), VerificationLevel::Basic);
        assert_eq!(map_tier("tier2"), VerificationLevel::Standard);
        assert_eq!(map_tier("TIER3"), VerificationLevel::Enhanced);
        assert_eq!(map_tier("platinum"), VerificationLevel::Basic);
    }

    #[test]
    fn test_transfer_wire_decoding_and_mapping() {
        let json = r#"{
            "id": "tr_44",
            "reference": "inv-2001",
            "state": "funds_confirmed",
            "sell_currency": "USDT",
            "sell_amount": "500.00",
            "buy_currency": "KES",
            "buy_amount": "64500.00",
            "rate": "129",
            "total_fees": "5.00",
            "chain": "tron",
            "recipient": {"full_name": "Jomo Mwangi", "account_identifier": "0123456789"},
            "funding_address": "TXabc",
            "created_at": "2026-08-01T10:00:00Z",
            "updated_at": "2026-08-01T10:05:00Z"
        }"#;
        let wire: BwTransfer = serde_json::from_str(json).unwrap();
        assert_eq!(map_transfer_state(&wire.state), PayoutStatus::FundsReceived);
        assert_eq!(wire.recipient.account_identifier.as_deref(), Some("0123456789"));
        assert_eq!(wire.funding_address.as_deref(), Some("TXabc"));
    }
}
