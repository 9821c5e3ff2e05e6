//! # Application State
//!
//! Shared state for the Axum application.
//! Holds server configuration, gateway settings and the clock handed to
//! every controller. Controllers themselves are built per request.

use gateway_core::{
    system_clock, CardEntryController, GatewayConfig, SharedClock, WalletContext,
    WalletEntryController, WalletParams,
};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port).parse().map_err(|e| {
            anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e)
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Demo values and fallbacks
    pub gateway: Arc<GatewayConfig>,
    /// Clock used for expiry validation and token stamps
    pub clock: SharedClock,
}

impl AppState {
    /// Create state from the environment and `config/gateway.toml`
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let gateway = load_gateway_config()?;
        Ok(Self::with_parts(config, gateway, system_clock()))
    }

    /// Assemble state from explicit parts (tests, embedding)
    pub fn with_parts(config: AppConfig, gateway: GatewayConfig, clock: SharedClock) -> Self {
        Self {
            config,
            gateway: Arc::new(gateway),
            clock,
        }
    }

    /// Fresh card controller for one request
    pub fn card_controller(&self) -> CardEntryController {
        CardEntryController::new(&self.gateway, self.clock.clone())
    }

    /// Fresh wallet controller for one request, resolving its incoming context
    pub fn wallet_controller(&self, params: &WalletParams) -> WalletEntryController {
        let context = WalletContext::resolve(params, &self.gateway);
        WalletEntryController::new(context, &self.gateway, self.clock.clone())
    }
}

/// Load gateway settings from config file
fn load_gateway_config() -> anyhow::Result<GatewayConfig> {
    let config_paths = [
        "config/gateway.toml",
        "../config/gateway.toml",
        "../../config/gateway.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let gateway = GatewayConfig::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded gateway config from {}", path);
            return Ok(gateway);
        }
    }

    tracing::warn!("No gateway config found, using defaults");
    Ok(GatewayConfig::default())
}
