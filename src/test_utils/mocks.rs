//! Mock provider used by unit and integration tests.
//!
//! The mock records every call so tests can assert not only on outcomes but
//! on how many probes and operations actually ran, which is what the
//! failover properties are really about.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::{
    CreateCustomerRequest, CreatePayoutRequest, CreateQuoteRequest, Customer, CustomerType,
    InitiateKybRequest, InitiateKycRequest, OperationResult, PaginationParams, Payout,
    PayoutParty, PayoutProvider, PayoutStatus, ProviderError, ProviderId, Quote,
    SubmitVerificationRequest, UpdateCustomerRequest, UploadDocumentRequest,
    VerificationDocument, VerificationInfo, VerificationLevel, VerificationStatus,
};
use crate::infra::webhook::verify_signature;

/// Static behavior knobs for a [`MockProvider`]
#[derive(Debug, Clone)]
pub struct MockProviderConfig {
    pub id: ProviderId,
    /// When set, every operation returns a failed result with this code
    pub fail_ops: Option<String>,
    /// Artificial latency added to each health probe
    pub probe_delay: Option<Duration>,
    /// Exchange rate used for mock quotes, so comparison tests can tell
    /// providers apart
    pub quote_rate: Decimal,
    pub webhook_secret: Option<String>,
}

impl MockProviderConfig {
    pub fn new(id: ProviderId) -> Self {
        Self {
            id,
            fail_ops: None,
            probe_delay: None,
            quote_rate: Decimal::new(1550, 0),
            webhook_secret: None,
        }
    }
}

/// Scriptable in-memory provider
pub struct MockProvider {
    config: MockProviderConfig,
    healthy: AtomicBool,
    health_calls: AtomicU32,
    op_calls: AtomicU32,
}

impl MockProvider {
    pub fn healthy(id: ProviderId) -> Self {
        Self::with_config(MockProviderConfig::new(id), true)
    }

    pub fn unhealthy(id: ProviderId) -> Self {
        Self::with_config(MockProviderConfig::new(id), false)
    }

    pub fn with_config(config: MockProviderConfig, healthy: bool) -> Self {
        Self {
            config,
            healthy: AtomicBool::new(healthy),
            health_calls: AtomicU32::new(0),
            op_calls: AtomicU32::new(0),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn health_call_count(&self) -> u32 {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub fn op_call_count(&self) -> u32 {
        self.op_calls.load(Ordering::SeqCst)
    }

    fn op<T>(&self, value: T) -> OperationResult<T> {
        self.op_calls.fetch_add(1, Ordering::SeqCst);
        match &self.config.fail_ops {
            Some(code) => OperationResult::failed(code.clone(), "mock configured to fail"),
            None => OperationResult::Ok(value),
        }
    }
}

pub fn sample_customer(provider: ProviderId) -> Customer {
    Customer {
        id: format!("cus_mock_{provider}"),
        customer_type: CustomerType::Individual,
        full_name: "Ada Okafor".to_string(),
        email: "ada@example.com".to_string(),
        country: "NG".to_string(),
        verification_status: VerificationStatus::Approved,
        provider,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_verification() -> VerificationInfo {
    VerificationInfo {
        status: VerificationStatus::InReview,
        level: VerificationLevel::Standard,
        kyc_completed: false,
        kyb_completed: false,
        checks: vec![],
        documents: vec![],
        risk_score: Some(12),
        risk_level: None,
        submitted_at: Some(Utc::now()),
        completed_at: None,
        expires_at: None,
    }
}

pub fn sample_document() -> VerificationDocument {
    VerificationDocument {
        id: "doc_mock_1".to_string(),
        document_type: "passport".to_string(),
        status: VerificationStatus::Pending,
        uploaded_at: Some(Utc::now()),
    }
}

pub fn sample_quote(provider: ProviderId, rate: Decimal) -> Quote {
    let source_amount = Decimal::new(10000, 2);
    Quote {
        id: format!("qt_mock_{provider}"),
        source_currency: "USDC".to_string(),
        target_currency: "NGN".to_string(),
        source_amount,
        target_amount: source_amount * rate,
        exchange_rate: rate,
        fee_amount: Decimal::new(100, 2),
        fee_breakdown: vec![],
        network: Some("polygon".to_string()),
        provider,
        created_at: Utc::now(),
        expires_at: Utc::now() + chrono::Duration::minutes(10),
    }
}

pub fn sample_payout(provider: ProviderId) -> Payout {
    Payout {
        id: format!("po_mock_{provider}"),
        external_id: None,
        provider,
        provider_order_id: format!("ord_mock_{provider}"),
        status: PayoutStatus::AwaitingFunds,
        source_currency: "USDC".to_string(),
        source_amount: Decimal::new(10000, 2),
        target_currency: "NGN".to_string(),
        target_amount: Decimal::new(15500000, 2),
        exchange_rate: Decimal::new(1550, 0),
        fee_amount: Decimal::new(100, 2),
        network: Some("polygon".to_string()),
        sender: PayoutParty::default(),
        beneficiary: PayoutParty {
            name: "Ada Okafor".to_string(),
            account_reference: Some("0123456789".to_string()),
            bank_name: Some("GTBank".to_string()),
            country: Some("NG".to_string()),
        },
        deposit_wallet: Some("0xmock".to_string()),
        payment_method: Some("bank_transfer".to_string()),
        blockchain_tx_hash: None,
        bank_reference: None,
        failure_reason: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        completed_at: None,
    }
}

#[async_trait]
impl PayoutProvider for MockProvider {
    fn id(&self) -> ProviderId {
        self.config.id
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.config.probe_delay {
            tokio::time::sleep(delay).await;
        }
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProviderError::Http("mock unhealthy".to_string()))
        }
    }

    async fn create_customer(&self, _req: &CreateCustomerRequest) -> OperationResult<Customer> {
        self.op(sample_customer(self.config.id))
    }

    async fn get_customer(&self, _customer_id: &str) -> OperationResult<Customer> {
        self.op(sample_customer(self.config.id))
    }

    async fn update_customer(
        &self,
        _customer_id: &str,
        _req: &UpdateCustomerRequest,
    ) -> OperationResult<Customer> {
        self.op(sample_customer(self.config.id))
    }

    async fn list_customers(&self, _params: &PaginationParams) -> OperationResult<Vec<Customer>> {
        self.op(vec![sample_customer(self.config.id)])
    }

    async fn initiate_kyc(&self, _req: &InitiateKycRequest) -> OperationResult<VerificationInfo> {
        self.op(sample_verification())
    }

    async fn kyc_status(&self, _customer_id: &str) -> OperationResult<VerificationInfo> {
        self.op(sample_verification())
    }

    async fn initiate_kyb(&self, _req: &InitiateKybRequest) -> OperationResult<VerificationInfo> {
        self.op(sample_verification())
    }

    async fn kyb_status(&self, _customer_id: &str) -> OperationResult<VerificationInfo> {
        self.op(sample_verification())
    }

    async fn upload_document(
        &self,
        _req: &UploadDocumentRequest,
    ) -> OperationResult<VerificationDocument> {
        self.op(sample_document())
    }

    async fn get_documents(
        &self,
        _customer_id: &str,
    ) -> OperationResult<Vec<VerificationDocument>> {
        self.op(vec![sample_document()])
    }

    async fn submit_verification(
        &self,
        _req: &SubmitVerificationRequest,
    ) -> OperationResult<VerificationInfo> {
        self.op(sample_verification())
    }

    async fn create_quote(&self, _req: &CreateQuoteRequest) -> OperationResult<Quote> {
        self.op(sample_quote(self.config.id, self.config.quote_rate))
    }

    async fn get_quote(&self, _quote_id: &str) -> OperationResult<Quote> {
        self.op(sample_quote(self.config.id, self.config.quote_rate))
    }

    async fn create_payout(&self, _req: &CreatePayoutRequest) -> OperationResult<Payout> {
        self.op(sample_payout(self.config.id))
    }

    async fn get_payout(&self, _payout_id: &str) -> OperationResult<Payout> {
        self.op(sample_payout(self.config.id))
    }

    async fn payout_status(&self, _payout_id: &str) -> OperationResult<PayoutStatus> {
        self.op(PayoutStatus::AwaitingFunds)
    }

    async fn cancel_payout(&self, _payout_id: &str) -> OperationResult<Payout> {
        let mut payout = sample_payout(self.config.id);
        payout.status = PayoutStatus::Cancelled;
        self.op(payout)
    }

    async fn list_payouts(&self, _params: &PaginationParams) -> OperationResult<Vec<Payout>> {
        self.op(vec![sample_payout(self.config.id)])
    }

    fn validate_webhook(&self, payload: &[u8], signature: &str) -> bool {
        match &self.config.webhook_secret {
            Some(secret) => verify_signature(secret.as_bytes(), payload, signature),
            None => true,
        }
    }
}
