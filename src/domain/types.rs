//! Domain types with validation support.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Identifier of a configured payout provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// AtlasPay payout API
    AtlasPay,
    /// BridgeWire payout API
    BridgeWire,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtlasPay => "atlaspay",
            Self::BridgeWire => "bridgewire",
        }
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "atlaspay" | "atlas_pay" => Ok(Self::AtlasPay),
            "bridgewire" | "bridge_wire" => Ok(Self::BridgeWire),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a payout order, mirrored from the owning provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    /// Order created, deposit instructions issued
    #[default]
    Created,
    /// Waiting for the stablecoin deposit to arrive
    AwaitingFunds,
    /// Deposit confirmed on-chain
    FundsReceived,
    /// Provider is converting and routing the payment
    Processing,
    /// Fiat payment sent to the beneficiary bank
    SentToBeneficiary,
    /// Payout settled
    Completed,
    /// Payout failed
    Failed,
    /// Payout cancelled before funds moved
    Cancelled,
    /// Deposit window elapsed without funds
    Expired,
    /// Held for manual compliance review
    PendingReview,
    /// Funds returned to the sender
    Refunded,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::AwaitingFunds => "awaiting_funds",
            Self::FundsReceived => "funds_received",
            Self::Processing => "processing",
            Self::SentToBeneficiary => "sent_to_beneficiary",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
            Self::PendingReview => "pending_review",
            Self::Refunded => "refunded",
        }
    }

    /// Terminal statuses never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Cancelled | Self::Expired | Self::Refunded
        )
    }
}

impl std::fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// KYC/KYB verification status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// No verification has been initiated
    #[default]
    NotStarted,
    /// Verification initiated, awaiting customer input
    Pending,
    /// Submitted and under review by the provider
    InReview,
    /// Provider requested more documents or data
    AdditionalInfoRequired,
    /// Verification passed
    Approved,
    /// Verification failed
    Rejected,
    /// Verification lapsed and must be redone
    Expired,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Pending => "pending",
            Self::InReview => "in_review",
            Self::AdditionalInfoRequired => "additional_info_required",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Expired)
    }

    /// Valid transitions out of this status. Providers own the state machine;
    /// this is used only for sanity checks in tests and logging.
    pub fn valid_transitions(&self) -> Vec<VerificationStatus> {
        match self {
            Self::NotStarted => vec![Self::Pending],
            Self::Pending => vec![Self::InReview, Self::Expired],
            Self::InReview => vec![
                Self::AdditionalInfoRequired,
                Self::Approved,
                Self::Rejected,
                Self::Expired,
            ],
            Self::AdditionalInfoRequired => vec![Self::InReview, Self::Expired],
            Self::Approved | Self::Rejected | Self::Expired => vec![],
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Depth of identity verification applied to a customer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationLevel {
    /// Name and document check only
    #[default]
    Basic,
    /// Basic plus address and sanctions screening
    Standard,
    /// Full enhanced due diligence
    Enhanced,
}

/// Risk classification assigned by the provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Kind of onboarded customer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    #[default]
    Individual,
    Business,
}

/// Customer account as reported by a provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Customer {
    /// Provider-assigned customer identifier
    #[schema(example = "cus_9f8e7d6c")]
    pub id: String,
    pub customer_type: CustomerType,
    #[schema(example = "Ada Okafor")]
    pub full_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// ISO 3166-1 alpha-2 country code
    #[schema(example = "NG")]
    pub country: String,
    pub verification_status: VerificationStatus,
    /// Which adapter produced this record
    pub provider: ProviderId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single compliance check performed during verification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct VerificationCheck {
    /// Check identifier, e.g. "document", "liveness", "sanctions"
    pub name: String,
    pub status: VerificationStatus,
    pub message: Option<String>,
}

/// A document attached to a verification case
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct VerificationDocument {
    pub id: String,
    /// e.g. "passport", "utility_bill", "certificate_of_incorporation"
    pub document_type: String,
    pub status: VerificationStatus,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Aggregated verification state for a customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct VerificationInfo {
    pub status: VerificationStatus,
    pub level: VerificationLevel,
    pub kyc_completed: bool,
    pub kyb_completed: bool,
    pub checks: Vec<VerificationCheck>,
    pub documents: Vec<VerificationDocument>,
    /// Provider risk score, provider-specific scale
    pub risk_score: Option<i32>,
    pub risk_level: Option<RiskLevel>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// One component of a quote's fee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct FeeComponent {
    /// e.g. "network", "fx_spread", "processing"
    pub name: String,
    pub amount: Decimal,
    pub currency: String,
}

/// A time-boxed exchange-rate and fee commitment for a prospective payout.
/// Expiry is advisory only; the provider remains the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Quote {
    #[schema(example = "qt_51c2aa90")]
    pub id: String,
    /// Stablecoin being sold, e.g. "USDC"
    #[schema(example = "USDC")]
    pub source_currency: String,
    /// Fiat currency delivered, e.g. "NGN"
    #[schema(example = "NGN")]
    pub target_currency: String,
    pub source_amount: Decimal,
    pub target_amount: Decimal,
    pub exchange_rate: Decimal,
    pub fee_amount: Decimal,
    pub fee_breakdown: Vec<FeeComponent>,
    /// Settlement network for the deposit, e.g. "polygon"
    pub network: Option<String>,
    pub provider: ProviderId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Quote {
    /// A quote is valid while the current time is before its expiry
    pub fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

/// Counterparty details on a payout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, ToSchema)]
pub struct PayoutParty {
    pub name: String,
    /// IBAN, account number, or wallet depending on rail
    pub account_reference: Option<String>,
    pub bank_name: Option<String>,
    pub country: Option<String>,
}

/// A stablecoin-to-fiat payout order. Status transitions are owned by the
/// provider; this layer only mirrors them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Payout {
    #[schema(example = "po_7b3f2a11")]
    pub id: String,
    /// Caller-supplied idempotency reference
    pub external_id: Option<String>,
    pub provider: ProviderId,
    /// Provider's own order identifier
    pub provider_order_id: String,
    pub status: PayoutStatus,
    pub source_currency: String,
    pub source_amount: Decimal,
    pub target_currency: String,
    pub target_amount: Decimal,
    pub exchange_rate: Decimal,
    pub fee_amount: Decimal,
    pub network: Option<String>,
    pub sender: PayoutParty,
    pub beneficiary: PayoutParty,
    /// Wallet address the sender must fund
    pub deposit_wallet: Option<String>,
    /// e.g. "bank_transfer", "mobile_money"
    pub payment_method: Option<String>,
    pub blockchain_tx_hash: Option<String>,
    pub bank_reference: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Result of probing one provider. Created fresh on every probe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct HealthCheckResult {
    pub healthy: bool,
    /// Short status label, e.g. "ok" or "unreachable"
    pub status: String,
    pub message: Option<String>,
    /// Wall-clock latency of the probe in milliseconds
    pub latency_ms: u64,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    pub fn healthy(latency_ms: u64) -> Self {
        Self {
            healthy: true,
            status: "ok".to_string(),
            message: None,
            latency_ms,
            checked_at: Utc::now(),
        }
    }

    pub fn unhealthy(message: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            healthy: false,
            status: "unreachable".to_string(),
            message: Some(message.into()),
            latency_ms,
            checked_at: Utc::now(),
        }
    }
}

/// Outcome of a provider operation once an adapter was chosen and invoked.
///
/// Operation failures are values, not errors: the provider answered, but the
/// business call did not succeed. Selection failures use
/// [`crate::domain::SelectionError`] instead; the two must not be collapsed.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    Ok(T),
    Failed {
        /// Stable machine-readable code, e.g. "PAYOUT_CREATE_FAILED"
        code: String,
        /// Human-readable message; may carry the provider's raw response body
        message: String,
    },
}

impl<T> OperationResult<T> {
    pub fn ok(value: T) -> Self {
        Self::Ok(value)
    }

    pub fn failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Ok(v) => Some(v),
            Self::Failed { .. } => None,
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Failed { code, .. } => Some(code),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        match self {
            Self::Ok(v) => OperationResult::Ok(f(v)),
            Self::Failed { code, message } => OperationResult::Failed { code, message },
        }
    }
}

/// Uniform response envelope returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiEnvelope<T: ToSchema> {
    pub success: bool,
    pub data: Option<T>,
    #[schema(example = "PAYOUT_CREATE_FAILED")]
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl<T: ToSchema> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error_code: None,
            error_message: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error_code: Some(code.into()),
            error_message: Some(message.into()),
        }
    }
}

impl<T: ToSchema> From<OperationResult<T>> for ApiEnvelope<T> {
    fn from(result: OperationResult<T>) -> Self {
        match result {
            OperationResult::Ok(data) => Self::ok(data),
            OperationResult::Failed { code, message } => Self::error(code, message),
        }
    }
}

/// Overall status of the gateway's provider fleet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every registered provider is reachable
    Healthy,
    /// At least one provider is down but another is available
    Degraded,
    /// No registered provider is reachable
    Unhealthy,
}

/// Aggregated health report across all registered providers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GatewayHealthResponse {
    pub status: HealthStatus,
    pub providers: HashMap<ProviderId, HealthCheckResult>,
    pub timestamp: DateTime<Utc>,
    #[schema(example = "0.1.0")]
    pub version: String,
}

impl GatewayHealthResponse {
    #[must_use]
    pub fn new(providers: HashMap<ProviderId, HealthCheckResult>) -> Self {
        let healthy = providers.values().filter(|r| r.healthy).count();
        let status = if providers.is_empty() || healthy == 0 {
            HealthStatus::Unhealthy
        } else if healthy == providers.len() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };
        Self {
            status,
            providers,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// ============================================================================
// REQUEST DTOS
// ============================================================================

/// Request to onboard a new customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub customer_type: CustomerType,
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    #[schema(example = "Ada Okafor")]
    pub full_name: String,
    #[validate(email(message = "A valid email is required"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(equal = 2, message = "Country must be an ISO 3166-1 alpha-2 code"))]
    #[schema(example = "NG")]
    pub country: String,
}

/// Partial update of an existing customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Request to start a KYC flow for a customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct InitiateKycRequest {
    #[validate(length(min = 1, message = "Customer id is required"))]
    pub customer_id: String,
    #[serde(default)]
    pub level: VerificationLevel,
    /// Where the provider's hosted flow should redirect on completion
    #[validate(url)]
    pub redirect_url: Option<String>,
}

/// Request to start a KYB flow for a business customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct InitiateKybRequest {
    #[validate(length(min = 1, message = "Customer id is required"))]
    pub customer_id: String,
    #[validate(length(min = 1, max = 255))]
    pub company_name: Option<String>,
    /// Company registration number in the incorporation country
    pub registration_number: Option<String>,
}

/// Request to attach a document to a verification case
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UploadDocumentRequest {
    #[validate(length(min = 1, message = "Customer id is required"))]
    pub customer_id: String,
    #[validate(length(min = 1, message = "Document type is required"))]
    #[schema(example = "passport")]
    pub document_type: String,
    /// Pre-uploaded file location the provider can fetch
    #[validate(url(message = "A valid file URL is required"))]
    pub file_url: String,
}

/// Request to submit a completed verification case for review
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitVerificationRequest {
    #[validate(length(min = 1, message = "Customer id is required"))]
    pub customer_id: String,
}

/// Request for an exchange quote
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateQuoteRequest {
    #[validate(length(min = 2, max = 10))]
    #[schema(example = "USDC")]
    pub source_currency: String,
    #[validate(length(equal = 3, message = "Target currency must be an ISO 4217 code"))]
    #[schema(example = "NGN")]
    pub target_currency: String,
    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    #[schema(example = 250.0)]
    pub source_amount: f64,
    pub network: Option<String>,
}

/// Request to execute a payout, usually against a previously issued quote
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePayoutRequest {
    /// Quote to execute; omit to let the provider price at market
    pub quote_id: Option<String>,
    /// Caller-side idempotency reference
    #[validate(length(max = 64))]
    pub external_id: Option<String>,
    #[validate(length(min = 1, message = "Customer id is required"))]
    pub customer_id: String,
    #[validate(length(min = 2, max = 10))]
    pub source_currency: String,
    #[validate(length(equal = 3))]
    pub target_currency: String,
    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    pub source_amount: f64,
    pub network: Option<String>,
    #[validate(nested)]
    pub beneficiary: BeneficiaryDetails,
}

/// Beneficiary bank details for a payout
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BeneficiaryDetails {
    #[validate(length(min = 1, max = 255, message = "Beneficiary name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Account reference is required"))]
    pub account_reference: String,
    pub bank_name: Option<String>,
    #[validate(length(equal = 2))]
    pub country: Option<String>,
}

/// Query parameter used to pin execution to one provider
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ProviderQuery {
    /// Provider to use; omitted means default-with-failover
    pub provider: Option<ProviderId>,
}

/// Pagination parameters for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, utoipa::IntoParams)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 20)
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    #[serde(default = "default_limit")]
    #[schema(example = 20)]
    pub limit: i64,
    /// Opaque provider cursor to start after
    pub cursor: Option<String>,
}

fn default_limit() -> i64 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            cursor: None,
        }
    }
}
