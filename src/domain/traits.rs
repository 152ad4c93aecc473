//! Domain traits defining contracts for external payout providers.

use async_trait::async_trait;

use super::error::ProviderError;
use super::types::{
    CreateCustomerRequest, CreatePayoutRequest, CreateQuoteRequest, Customer, InitiateKybRequest,
    InitiateKycRequest, OperationResult, PaginationParams, Payout, PayoutStatus, ProviderId,
    Quote, SubmitVerificationRequest, UpdateCustomerRequest, UploadDocumentRequest,
    VerificationDocument, VerificationInfo,
};

/// The common contract every payout provider adapter implements.
///
/// One instance exists per configured, enabled provider, owned by the
/// registry for the process lifetime. Operations return [`OperationResult`]
/// values: a provider rejecting a request is a business outcome, not an
/// error. Transport failures are caught inside the adapter and surfaced as
/// `PROVIDER_ERROR` results; only `health_check` lets them escape.
#[async_trait]
pub trait PayoutProvider: Send + Sync {
    /// Stable identifier for this adapter
    fn id(&self) -> ProviderId;

    /// Lightweight reachability probe against the provider API
    async fn health_check(&self) -> Result<(), ProviderError>;

    // --- Customers ---

    async fn create_customer(&self, req: &CreateCustomerRequest) -> OperationResult<Customer>;

    async fn get_customer(&self, customer_id: &str) -> OperationResult<Customer>;

    async fn update_customer(
        &self,
        customer_id: &str,
        req: &UpdateCustomerRequest,
    ) -> OperationResult<Customer>;

    async fn list_customers(&self, params: &PaginationParams) -> OperationResult<Vec<Customer>>;

    // --- KYC / KYB ---

    async fn initiate_kyc(&self, req: &InitiateKycRequest) -> OperationResult<VerificationInfo>;

    async fn kyc_status(&self, customer_id: &str) -> OperationResult<VerificationInfo>;

    async fn initiate_kyb(&self, req: &InitiateKybRequest) -> OperationResult<VerificationInfo>;

    async fn kyb_status(&self, customer_id: &str) -> OperationResult<VerificationInfo>;

    async fn upload_document(
        &self,
        req: &UploadDocumentRequest,
    ) -> OperationResult<VerificationDocument>;

    async fn get_documents(&self, customer_id: &str)
    -> OperationResult<Vec<VerificationDocument>>;

    async fn submit_verification(
        &self,
        req: &SubmitVerificationRequest,
    ) -> OperationResult<VerificationInfo>;

    // --- Quotes ---

    async fn create_quote(&self, req: &CreateQuoteRequest) -> OperationResult<Quote>;

    async fn get_quote(&self, quote_id: &str) -> OperationResult<Quote>;

    // --- Payouts ---

    async fn create_payout(&self, req: &CreatePayoutRequest) -> OperationResult<Payout>;

    async fn get_payout(&self, payout_id: &str) -> OperationResult<Payout>;

    async fn payout_status(&self, payout_id: &str) -> OperationResult<PayoutStatus>;

    async fn cancel_payout(&self, payout_id: &str) -> OperationResult<Payout>;

    async fn list_payouts(&self, params: &PaginationParams) -> OperationResult<Vec<Payout>>;

    // --- Webhooks ---

    /// Validate an inbound webhook signature against the raw payload bytes.
    /// Must run before any parsing of the payload.
    fn validate_webhook(&self, payload: &[u8], signature: &str) -> bool;
}
