//! # Gateway Configuration
//!
//! Demo values and fallbacks used by the entry controllers.
//! Loaded from `config/gateway.toml`; every key is optional.

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};

/// Upper bound accepted for `expiry_year_window`
pub const MAX_EXPIRY_YEAR_WINDOW: i32 = 100;

/// Mock gateway settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Merchant name shown in page footers
    pub merchant_name: String,

    /// Order identifier used by the card flow and by the wallet flow when none is supplied
    pub demo_order: String,

    /// Amount (smallest currency unit) reported by the card flow
    pub demo_amount_cents: i64,

    /// Wallet number used when the wallet view is entered without one
    pub default_wallet_number: String,

    /// Amount (major units, decimal text) used when the wallet view is entered without one
    pub default_amount: String,

    /// Currency label shown next to wallet amounts
    pub wallet_currency: String,

    /// Token prefix for the card flow
    pub card_token_prefix: String,

    /// Token prefix for the wallet flow
    pub wallet_token_prefix: String,

    /// How many years past the current one an expiry year may be
    pub expiry_year_window: i32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            merchant_name: "paymob".to_string(),
            demo_order: "123456".to_string(),
            demo_amount_cents: 100,
            default_wallet_number: "01010101010".to_string(),
            default_amount: "1".to_string(),
            wallet_currency: "EGP".to_string(),
            card_token_prefix: "mock_tok_".to_string(),
            wallet_token_prefix: "mock_wallet_tok_".to_string(),
            expiry_year_window: 20,
        }
    }
}

impl GatewayConfig {
    /// Parse from TOML text
    pub fn from_toml(content: &str) -> CheckoutResult<Self> {
        let config: GatewayConfig =
            toml::from_str(content).map_err(|e| CheckoutError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CheckoutResult<()> {
        if !(0..=MAX_EXPIRY_YEAR_WINDOW).contains(&self.expiry_year_window) {
            return Err(CheckoutError::Configuration(format!(
                "expiry_year_window must be between 0 and {}",
                MAX_EXPIRY_YEAR_WINDOW
            )));
        }
        if self.demo_amount_cents < 0 {
            return Err(CheckoutError::Configuration(
                "demo_amount_cents must not be negative".to_string(),
            ));
        }
        if crate::wallet::amount_to_cents(&self.default_amount).is_none() {
            return Err(CheckoutError::Configuration(format!(
                "default_amount is not a valid amount: {:?}",
                self.default_amount
            )));
        }
        Ok(())
    }
}
