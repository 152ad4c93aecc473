//! Unified facade over the registered payout providers.
//!
//! One method per logical operation. Every method resolves an adapter
//! through the failover selector and delegates the call unchanged, so
//! failover policy lives in exactly one place. Selection failures propagate
//! as [`SelectionError`]; once an adapter was chosen, outcomes are
//! [`OperationResult`] values.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{
    CreateCustomerRequest, CreatePayoutRequest, CreateQuoteRequest, Customer,
    GatewayHealthResponse, InitiateKybRequest, InitiateKycRequest, OperationResult,
    PaginationParams, Payout, PayoutProvider, PayoutStatus, ProviderId, Quote, SelectionError,
    SubmitVerificationRequest, UpdateCustomerRequest, UploadDocumentRequest,
    VerificationDocument, VerificationInfo,
};

use super::prober::HealthProber;
use super::registry::ProviderRegistry;
use super::selector::FailoverSelector;

/// The single entry point used by the HTTP layer
pub struct PayoutService {
    registry: Arc<ProviderRegistry>,
    selector: FailoverSelector,
    prober: HealthProber,
}

impl PayoutService {
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, failover_enabled: bool) -> Self {
        let selector = FailoverSelector::new(Arc::clone(&registry), failover_enabled);
        Self {
            registry,
            selector,
            prober: HealthProber::new(),
        }
    }

    async fn adapter(
        &self,
        preferred: Option<ProviderId>,
    ) -> Result<Arc<dyn PayoutProvider>, SelectionError> {
        self.selector.select(preferred).await
    }

    // --- Customers ---

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn create_customer(
        &self,
        preferred: Option<ProviderId>,
        req: &CreateCustomerRequest,
    ) -> Result<OperationResult<Customer>, SelectionError> {
        Ok(self.adapter(preferred).await?.create_customer(req).await)
    }

    #[instrument(skip(self))]
    pub async fn get_customer(
        &self,
        preferred: Option<ProviderId>,
        customer_id: &str,
    ) -> Result<OperationResult<Customer>, SelectionError> {
        Ok(self.adapter(preferred).await?.get_customer(customer_id).await)
    }

    #[instrument(skip(self, req))]
    pub async fn update_customer(
        &self,
        preferred: Option<ProviderId>,
        customer_id: &str,
        req: &UpdateCustomerRequest,
    ) -> Result<OperationResult<Customer>, SelectionError> {
        Ok(self
            .adapter(preferred)
            .await?
            .update_customer(customer_id, req)
            .await)
    }

    #[instrument(skip(self, params))]
    pub async fn list_customers(
        &self,
        preferred: Option<ProviderId>,
        params: &PaginationParams,
    ) -> Result<OperationResult<Vec<Customer>>, SelectionError> {
        Ok(self.adapter(preferred).await?.list_customers(params).await)
    }

    // --- KYC / KYB ---

    #[instrument(skip(self, req), fields(customer = %req.customer_id))]
    pub async fn initiate_kyc(
        &self,
        preferred: Option<ProviderId>,
        req: &InitiateKycRequest,
    ) -> Result<OperationResult<VerificationInfo>, SelectionError> {
        Ok(self.adapter(preferred).await?.initiate_kyc(req).await)
    }

    #[instrument(skip(self))]
    pub async fn kyc_status(
        &self,
        preferred: Option<ProviderId>,
        customer_id: &str,
    ) -> Result<OperationResult<VerificationInfo>, SelectionError> {
        Ok(self.adapter(preferred).await?.kyc_status(customer_id).await)
    }

    #[instrument(skip(self, req), fields(customer = %req.customer_id))]
    pub async fn initiate_kyb(
        &self,
        preferred: Option<ProviderId>,
        req: &InitiateKybRequest,
    ) -> Result<OperationResult<VerificationInfo>, SelectionError> {
        Ok(self.adapter(preferred).await?.initiate_kyb(req).await)
    }

    #[instrument(skip(self))]
    pub async fn kyb_status(
        &self,
        preferred: Option<ProviderId>,
        customer_id: &str,
    ) -> Result<OperationResult<VerificationInfo>, SelectionError> {
        Ok(self.adapter(preferred).await?.kyb_status(customer_id).await)
    }

    #[instrument(skip(self, req), fields(customer = %req.customer_id))]
    pub async fn upload_document(
        &self,
        preferred: Option<ProviderId>,
        req: &UploadDocumentRequest,
    ) -> Result<OperationResult<VerificationDocument>, SelectionError> {
        Ok(self.adapter(preferred).await?.upload_document(req).await)
    }

    #[instrument(skip(self))]
    pub async fn get_documents(
        &self,
        preferred: Option<ProviderId>,
        customer_id: &str,
    ) -> Result<OperationResult<Vec<VerificationDocument>>, SelectionError> {
        Ok(self
            .adapter(preferred)
            .await?
            .get_documents(customer_id)
            .await)
    }

    #[instrument(skip(self, req), fields(customer = %req.customer_id))]
    pub async fn submit_verification(
        &self,
        preferred: Option<ProviderId>,
        req: &SubmitVerificationRequest,
    ) -> Result<OperationResult<VerificationInfo>, SelectionError> {
        Ok(self
            .adapter(preferred)
            .await?
            .submit_verification(req)
            .await)
    }

    // --- Quotes ---

    #[instrument(skip(self, req), fields(pair = format!("{}/{}", req.source_currency, req.target_currency)))]
    pub async fn create_quote(
        &self,
        preferred: Option<ProviderId>,
        req: &CreateQuoteRequest,
    ) -> Result<OperationResult<Quote>, SelectionError> {
        Ok(self.adapter(preferred).await?.create_quote(req).await)
    }

    /// Fan out the quote request to every registered adapter concurrently
    /// and collect the successes. No failover is involved: a provider that
    /// fails to quote simply does not appear in the comparison.
    #[instrument(skip(self, req))]
    pub async fn create_quotes_from_all_providers(&self, req: &CreateQuoteRequest) -> Vec<Quote> {
        let requests = self
            .registry
            .all()
            .iter()
            .map(|adapter| async move { (adapter.id(), adapter.create_quote(req).await) });

        let mut quotes = Vec::new();
        for (provider, result) in join_all(requests).await {
            match result {
                OperationResult::Ok(quote) => quotes.push(quote),
                OperationResult::Failed { code, message } => {
                    warn!(%provider, %code, %message, "Provider failed to quote, excluded from comparison");
                }
            }
        }
        info!(quotes = quotes.len(), "Quote comparison complete");
        quotes
    }

    #[instrument(skip(self))]
    pub async fn get_quote(
        &self,
        preferred: Option<ProviderId>,
        quote_id: &str,
    ) -> Result<OperationResult<Quote>, SelectionError> {
        Ok(self.adapter(preferred).await?.get_quote(quote_id).await)
    }

    // --- Payouts ---

    /// Execute a payout. A missing caller idempotency reference is filled in
    /// with a generated one so retries against the provider stay idempotent.
    #[instrument(skip(self, req), fields(customer = %req.customer_id))]
    pub async fn create_payout(
        &self,
        preferred: Option<ProviderId>,
        req: &CreatePayoutRequest,
    ) -> Result<OperationResult<Payout>, SelectionError> {
        let adapter = self.adapter(preferred).await?;
        if req.external_id.is_none() {
            let mut req = req.clone();
            req.external_id = Some(Uuid::new_v4().to_string());
            return Ok(adapter.create_payout(&req).await);
        }
        Ok(adapter.create_payout(req).await)
    }

    #[instrument(skip(self))]
    pub async fn get_payout(
        &self,
        preferred: Option<ProviderId>,
        payout_id: &str,
    ) -> Result<OperationResult<Payout>, SelectionError> {
        Ok(self.adapter(preferred).await?.get_payout(payout_id).await)
    }

    #[instrument(skip(self))]
    pub async fn get_payout_status(
        &self,
        preferred: Option<ProviderId>,
        payout_id: &str,
    ) -> Result<OperationResult<PayoutStatus>, SelectionError> {
        Ok(self.adapter(preferred).await?.payout_status(payout_id).await)
    }

    #[instrument(skip(self))]
    pub async fn cancel_payout(
        &self,
        preferred: Option<ProviderId>,
        payout_id: &str,
    ) -> Result<OperationResult<Payout>, SelectionError> {
        Ok(self.adapter(preferred).await?.cancel_payout(payout_id).await)
    }

    #[instrument(skip(self, params))]
    pub async fn list_payouts(
        &self,
        preferred: Option<ProviderId>,
        params: &PaginationParams,
    ) -> Result<OperationResult<Vec<Payout>>, SelectionError> {
        Ok(self.adapter(preferred).await?.list_payouts(params).await)
    }

    // --- Health ---

    /// Probe all registered providers and aggregate into a fleet report
    #[instrument(skip(self))]
    pub async fn health(&self) -> GatewayHealthResponse {
        let results = self.prober.check_all(&self.registry).await;
        GatewayHealthResponse::new(results)
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn selector(&self) -> &FailoverSelector {
        &self.selector
    }
}
