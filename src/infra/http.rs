//! Shared HTTP plumbing for provider adapters.
//!
//! One [`ProviderHttpClient`] exists per adapter, shared across concurrent
//! calls. It owns the per-provider timeout, a bounded retry loop for
//! transport failures, and a circuit breaker that opens for
//! [`BREAKER_OPEN_SECS`] after [`BREAKER_THRESHOLD`] consecutive transient
//! failures.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::domain::{ConfigError, OperationResult, ProviderError};

/// Consecutive transient failures before the breaker opens
pub const BREAKER_THRESHOLD: u32 = 5;

/// How long the breaker stays open once tripped
pub const BREAKER_OPEN_SECS: u64 = 30;

/// Error code used when the adapter could not get a usable answer from the
/// provider at all (network, timeout, undecodable body).
pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";

/// Per-provider connection settings, bound from the environment at startup
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: SecretString,
    /// Merchant or client identifier sent alongside the API key
    pub client_id: String,
    pub webhook_secret: Option<SecretString>,
    pub timeout_secs: u64,
    /// Total attempts per request, including the first
    pub retry_count: u32,
}

#[derive(Debug, Default)]
struct BreakerState {
    consecutive_failures: u32,
    open_until: Option<Instant>,
}

/// A raw provider response: status plus body text. Adapters branch on the
/// status and own the deserialization of the body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client wrapper used by every provider adapter
pub struct ProviderHttpClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
    retry_count: u32,
    breaker: Mutex<BreakerState>,
}

impl ProviderHttpClient {
    /// Build a client from settings plus the provider's auth headers
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        retry_count: u32,
        default_headers: HeaderMap,
    ) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "http_client".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            retry_count: retry_count.max(1),
            breaker: Mutex::new(BreakerState::default()),
        })
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse, ProviderError> {
        self.execute(reqwest::Method::GET, path, None::<&()>).await
    }

    pub async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<HttpResponse, ProviderError> {
        self.execute(reqwest::Method::POST, path, Some(body)).await
    }

    pub async fn patch_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<HttpResponse, ProviderError> {
        self.execute(reqwest::Method::PATCH, path, Some(body)).await
    }

    pub async fn put_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<HttpResponse, ProviderError> {
        self.execute(reqwest::Method::PUT, path, Some(body)).await
    }

    async fn execute<B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpResponse, ProviderError> {
        self.check_breaker()?;

        let url = format!("{}{}", self.base_url, path);
        let mut last_error = None;

        for attempt in 1..=self.retry_count {
            let mut request = self.client.request(method.clone(), &url);
            if let Some(b) = body {
                request = request.json(b);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_default();
                    if status >= 500 {
                        self.record_failure();
                    } else {
                        self.record_success();
                    }
                    return Ok(HttpResponse { status, body });
                }
                Err(e) => {
                    let err = if e.is_timeout() {
                        ProviderError::Timeout(self.timeout_secs)
                    } else {
                        ProviderError::Http(e.to_string())
                    };
                    warn!(attempt, retries = self.retry_count, %url, error = %err, "Provider request attempt failed");
                    self.record_failure();
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::Http("no attempts made".to_string())))
    }

    fn check_breaker(&self) -> Result<(), ProviderError> {
        let mut state = self.breaker.lock().unwrap();
        if let Some(open_until) = state.open_until {
            if Instant::now() < open_until {
                return Err(ProviderError::CircuitOpen);
            }
            // Breaker window elapsed; allow a trial request through.
            state.open_until = None;
            state.consecutive_failures = 0;
            debug!("Circuit breaker half-open, allowing trial request");
        }
        Ok(())
    }

    fn record_failure(&self) {
        let mut state = self.breaker.lock().unwrap();
        state.consecutive_failures += 1;
        if state.consecutive_failures >= BREAKER_THRESHOLD && state.open_until.is_none() {
            state.open_until = Some(Instant::now() + Duration::from_secs(BREAKER_OPEN_SECS));
            warn!(
                failures = state.consecutive_failures,
                open_secs = BREAKER_OPEN_SECS,
                "Circuit breaker opened"
            );
        }
    }

    fn record_success(&self) {
        let mut state = self.breaker.lock().unwrap();
        state.consecutive_failures = 0;
        state.open_until = None;
    }
}

/// Branch on a provider call outcome the way every adapter does:
/// - 2xx with a decodable body → `Ok` with the wire value;
/// - any other status → failed result with `fail_code` and the raw body as
///   the message;
/// - transport or decode failure → failed result with [`PROVIDER_ERROR`],
///   logged in full server-side, never rethrown.
pub fn decode_response<W: DeserializeOwned>(
    outcome: Result<HttpResponse, ProviderError>,
    fail_code: &str,
    operation: &str,
) -> OperationResult<W> {
    match outcome {
        Ok(resp) if resp.is_success() => match serde_json::from_str::<W>(&resp.body) {
            Ok(wire) => OperationResult::Ok(wire),
            Err(e) => {
                error!(%operation, error = %e, "Failed to decode provider response");
                OperationResult::failed(
                    PROVIDER_ERROR,
                    format!("Undecodable provider response for {operation}"),
                )
            }
        },
        Ok(resp) => {
            warn!(%operation, status = resp.status, "Provider rejected request");
            OperationResult::failed(fail_code, resp.body)
        }
        Err(e) => {
            error!(%operation, error = %e, "Provider transport failure");
            OperationResult::failed(PROVIDER_ERROR, e.to_string())
        }
    }
}
