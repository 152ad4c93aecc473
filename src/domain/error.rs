//! Error definitions for the gateway.
//!
//! Two failure shapes exist on purpose and must not be merged:
//! - selection failures (no adapter could be chosen) are typed errors in
//!   [`SelectionError`] and map to 5xx responses;
//! - operation failures (an adapter was invoked and the provider said no) are
//!   values in [`crate::domain::OperationResult`] and map to 4xx envelopes.

use thiserror::Error;

use super::types::ProviderId;

/// Failure to choose an adapter. All variants are non-retryable from the
/// selector's perspective: retrying without an external state change will
/// reproduce the same failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Requested or default identifier has no registered adapter.
    /// A configuration error, not a health failure; never triggers failover.
    #[error("Provider not registered: {0}")]
    ProviderNotFound(String),

    /// The single target is unhealthy and failover is disabled
    #[error("Provider {0} is unavailable and failover is disabled")]
    ProviderUnavailable(ProviderId),

    /// Every registered adapter failed its health probe
    #[error("All registered providers are unavailable")]
    AllProvidersUnavailable,
}

/// Transport-level failure talking to a provider. Adapters catch these
/// locally and convert them into `PROVIDER_ERROR` operation results; they
/// only escape through health checks.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request to provider failed: {0}")]
    Http(String),

    #[error("Provider request timed out after {0}s")]
    Timeout(u64),

    #[error("Circuit breaker open for provider")]
    CircuitOpen,

    #[error("Failed to deserialize provider response: {0}")]
    Deserialize(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl ProviderError {
    /// Transient failures count against the circuit breaker; a well-formed
    /// error response from the provider does not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::CircuitOpen | Self::Deserialize(_) => false,
        }
    }
}

/// Request validation failures rejected before reaching the orchestrator
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Validation failed: {0}")]
    Multiple(String),
}

/// Configuration problems surfaced at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Top-level application error
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
