//! Application entry point.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::SecretString;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use stablecoin_payout_gateway::api::create_router;
use stablecoin_payout_gateway::app::{AppState, ProviderRegistry};
use stablecoin_payout_gateway::domain::ProviderId;
use stablecoin_payout_gateway::infra::{AtlasPayAdapter, BridgeWireAdapter, ProviderSettings};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRY_COUNT: u32 = 3;

/// Application configuration
struct Config {
    host: String,
    port: u16,
    default_provider: ProviderId,
    failover_enabled: bool,
    atlaspay: ProviderSettings,
    bridgewire: ProviderSettings,
}

impl Config {
    fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let default_provider = match env::var("DEFAULT_PROVIDER") {
            Ok(v) => ProviderId::from_str(&v)
                .map_err(|e| anyhow::anyhow!("DEFAULT_PROVIDER invalid: {e}"))?,
            Err(_) => ProviderId::AtlasPay,
        };

        let failover_enabled = env::var("FAILOVER_ENABLED")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        let atlaspay = provider_settings("ATLASPAY", "MERCHANT_ID")?;
        let bridgewire = provider_settings("BRIDGEWIRE", "CLIENT_ID")?;

        Ok(Self {
            host,
            port,
            default_provider,
            failover_enabled,
            atlaspay,
            bridgewire,
        })
    }
}

/// Bind one provider's settings from `{PREFIX}_*` environment variables.
/// A disabled provider needs no other variables set.
fn provider_settings(prefix: &str, id_key: &str) -> Result<ProviderSettings> {
    let enabled = env::var(format!("{prefix}_ENABLED"))
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    if !enabled {
        return Ok(ProviderSettings {
            enabled: false,
            base_url: String::new(),
            api_key: SecretString::from(String::new()),
            client_id: String::new(),
            webhook_secret: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_count: DEFAULT_RETRY_COUNT,
        });
    }

    let base_url =
        env::var(format!("{prefix}_BASE_URL")).context(format!("{prefix}_BASE_URL not set"))?;
    let api_key =
        env::var(format!("{prefix}_API_KEY")).context(format!("{prefix}_API_KEY not set"))?;
    let client_id =
        env::var(format!("{prefix}_{id_key}")).context(format!("{prefix}_{id_key} not set"))?;

    let webhook_secret = env::var(format!("{prefix}_WEBHOOK_SECRET"))
        .ok()
        .filter(|s| !s.is_empty())
        .map(SecretString::from);

    let timeout_secs = env::var(format!("{prefix}_TIMEOUT_SECS"))
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let retry_count = env::var(format!("{prefix}_RETRY_COUNT"))
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_RETRY_COUNT);

    Ok(ProviderSettings {
        enabled: true,
        base_url,
        api_key: SecretString::from(api_key),
        client_id,
        webhook_secret,
        timeout_secs,
        retry_count,
    })
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    info!(
        "🏗️  Stablecoin Payout Gateway v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    info!("📦 Assembling provider registry...");
    let mut registry = ProviderRegistry::new(config.default_provider);

    if config.atlaspay.enabled {
        let adapter = AtlasPayAdapter::from_settings(&config.atlaspay)?;
        registry.register(Arc::new(adapter));
        info!("   ✓ AtlasPay adapter registered");
        if config.atlaspay.webhook_secret.is_none() {
            warn!("   ⚠ AtlasPay webhook secret not configured (signature checks skipped)");
        }
    } else {
        info!("   ○ AtlasPay disabled");
    }

    if config.bridgewire.enabled {
        let adapter = BridgeWireAdapter::from_settings(&config.bridgewire)?;
        registry.register(Arc::new(adapter));
        info!("   ✓ BridgeWire adapter registered");
        if config.bridgewire.webhook_secret.is_none() {
            warn!("   ⚠ BridgeWire webhook secret not configured (signature checks skipped)");
        }
    } else {
        info!("   ○ BridgeWire disabled");
    }

    if registry.is_empty() {
        anyhow::bail!("No providers enabled; enable at least one of ATLASPAY or BRIDGEWIRE");
    }

    info!(
        "   ✓ Default provider: {} (failover {})",
        config.default_provider,
        if config.failover_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    let state = AppState::new(Arc::new(registry), config.failover_enabled);
    let router = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind listener")?;

    info!("🚀 Server starting on http://{}", addr);
    info!("📖 Swagger UI available at http://{}/swagger-ui", addr);
    info!("📄 OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
