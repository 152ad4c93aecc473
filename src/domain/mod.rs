//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, ProviderError, SelectionError, ValidationError};
pub use traits::PayoutProvider;
pub use types::{
    ApiEnvelope, BeneficiaryDetails, CreateCustomerRequest, CreatePayoutRequest,
    CreateQuoteRequest, Customer, CustomerType, FeeComponent, GatewayHealthResponse,
    HealthCheckResult, HealthStatus, InitiateKybRequest, InitiateKycRequest, OperationResult,
    PaginationParams, Payout, PayoutParty, PayoutStatus, ProviderId, ProviderQuery, Quote,
    RiskLevel, SubmitVerificationRequest, UpdateCustomerRequest, UploadDocumentRequest,
    VerificationCheck, VerificationDocument, VerificationInfo, VerificationLevel,
    VerificationStatus,
};
