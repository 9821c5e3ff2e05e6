//! # Mobile Wallet Entry
//!
//! MPIN/OTP form for a wallet payment. The wallet number, amount and order
//! are not part of the form: they come in with the view's own query string
//! and are echoed forward unchanged.

use crate::clock::SharedClock;
use crate::config::GatewayConfig;
use crate::error::{CheckoutError, CheckoutResult, ValidationErrors};
use crate::navigation::{first_value, query_pairs, Navigation, NavigationMessage};
use crate::normalize::{digits_only, is_all_digits};
use crate::token::TokenIssuer;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Digits in an MPIN or OTP
pub const SECRET_DIGITS: usize = 6;

pub const MPIN_ERROR: &str = "MPIN must be 6 digits";
pub const OTP_ERROR: &str = "OTP must be 6 digits";

/// Fields of the wallet form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletField {
    Mpin,
    Otp,
}

impl WalletField {
    pub const ALL: [WalletField; 2] = [WalletField::Mpin, WalletField::Otp];

    pub fn as_str(&self) -> &'static str {
        match self {
            WalletField::Mpin => "mpin",
            WalletField::Otp => "otp",
        }
    }
}

impl FromStr for WalletField {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mpin" => Ok(WalletField::Mpin),
            "otp" => Ok(WalletField::Otp),
            other => Err(CheckoutError::UnknownField {
                form: "wallet",
                field: other.to_string(),
            }),
        }
    }
}

/// Both wallet fields keep at most six digits
pub fn normalize_wallet_field(_field: WalletField, raw: &str) -> String {
    digits_only(raw, SECRET_DIGITS)
}

/// Convert a decimal amount in major units to the smallest unit
///
/// `"50"` → `5000`, `"12.34"` → `1234`. Rounds to the nearest cent.
/// Returns `None` for anything that is not a finite, non-negative number.
pub fn amount_to_cents(amount: &str) -> Option<i64> {
    let value: f64 = amount.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let cents = (value * 100.0).round();
    if cents > i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

/// Incoming query parameters of the wallet view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl WalletParams {
    /// Read from the view's query string
    ///
    /// Repeated keys keep their first value; anything undecodable is treated
    /// as missing and left to [`WalletContext::resolve`] to fill in.
    pub fn from_query(query: &str) -> Self {
        let pairs = query_pairs(query);
        Self {
            wallet_number: first_value(&pairs, "wallet_number"),
            amount: first_value(&pairs, "amount"),
            order: first_value(&pairs, "order"),
        }
    }
}

/// Read-only context the wallet view was entered with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletContext {
    pub wallet_number: String,
    /// Amount in major units, as decimal text
    pub amount: String,
    pub order: String,
}

impl WalletContext {
    /// Resolve incoming parameters, falling back to configured defaults
    ///
    /// Missing or empty values are replaced silently; an amount that does not
    /// parse is replaced too, with a warning.
    pub fn resolve(params: &WalletParams, config: &GatewayConfig) -> Self {
        let mut amount = pick(&params.amount, &config.default_amount);
        if amount_to_cents(&amount).is_none() {
            warn!(amount = %amount, "Ignoring malformed wallet amount");
            amount = config.default_amount.clone();
        }

        Self {
            wallet_number: pick(&params.wallet_number, &config.default_wallet_number),
            amount,
            order: pick(&params.order, &config.demo_order),
        }
    }

    pub fn amount_cents(&self) -> i64 {
        amount_to_cents(&self.amount).unwrap_or_default()
    }

    /// Query string reproducing this context, e.g. for a form action
    pub fn to_query_string(&self) -> CheckoutResult<String> {
        serde_urlencoded::to_string(self).map_err(|e| CheckoutError::Serialization(e.to_string()))
    }
}

/// Wallet form as displayed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletFormState {
    pub mpin: String,
    pub otp: String,
}

/// Validate a wallet form; both fields are always checked
pub fn validate_wallet(state: &WalletFormState) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if !is_secret(&state.mpin) {
        errors.insert(WalletField::Mpin.as_str(), MPIN_ERROR);
    }
    if !is_secret(&state.otp) {
        errors.insert(WalletField::Otp.as_str(), OTP_ERROR);
    }
    errors
}

fn pick(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn is_secret(value: &str) -> bool {
    value.len() == SECRET_DIGITS && is_all_digits(value)
}

/// Controller behind the wallet entry view
pub struct WalletEntryController {
    context: WalletContext,
    state: WalletFormState,
    errors: ValidationErrors,
    tokens: TokenIssuer,
}

impl WalletEntryController {
    pub fn new(context: WalletContext, config: &GatewayConfig, clock: SharedClock) -> Self {
        Self {
            context,
            state: WalletFormState::default(),
            errors: ValidationErrors::new(),
            tokens: TokenIssuer::new(config.wallet_token_prefix.clone(), clock),
        }
    }

    pub fn context(&self) -> &WalletContext {
        &self.context
    }

    pub fn state(&self) -> &WalletFormState {
        &self.state
    }

    /// Errors from the last submit
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn update_field(&mut self, field: WalletField, raw: &str) -> &WalletFormState {
        let value = normalize_wallet_field(field, raw);
        match field {
            WalletField::Mpin => self.state.mpin = value,
            WalletField::Otp => self.state.otp = value,
        }
        &self.state
    }

    pub fn update_named_field(
        &mut self,
        name: &str,
        raw: &str,
    ) -> CheckoutResult<&WalletFormState> {
        let field = name.parse::<WalletField>()?;
        Ok(self.update_field(field, raw))
    }

    pub fn validate(&self) -> ValidationErrors {
        validate_wallet(&self.state)
    }

    /// Validate and, if clean, build the navigation to the result view
    pub fn submit(&mut self) -> Result<Navigation, ValidationErrors> {
        self.errors = self.validate();
        if !self.errors.is_empty() {
            debug!(failed = self.errors.len(), "Wallet form rejected");
            return Err(self.errors.clone());
        }

        let amount_cents = self.context.amount_cents();
        info!(
            wallet_number = %self.context.wallet_number,
            order = %self.context.order,
            amount_cents,
            "Wallet payment approved"
        );

        let token = self.tokens.issue();
        let message = NavigationMessage::approved(&self.context.order, amount_cents, token)
            .with_wallet(&self.context.wallet_number);
        Ok(Navigation::to_result(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::navigation::{PaymentType, View};
    use std::sync::Arc;

    fn params(
        wallet_number: Option<&str>,
        amount: Option<&str>,
        order: Option<&str>,
    ) -> WalletParams {
        WalletParams {
            wallet_number: wallet_number.map(String::from),
            amount: amount.map(String::from),
            order: order.map(String::from),
        }
    }

    fn controller(params: &WalletParams) -> WalletEntryController {
        let config = GatewayConfig::default();
        WalletEntryController::new(
            WalletContext::resolve(params, &config),
            &config,
            Arc::new(FixedClock::at_year(2024)),
        )
    }

    #[test]
    fn test_context_defaults() {
        let config = GatewayConfig::default();
        let context = WalletContext::resolve(&WalletParams::default(), &config);
        assert_eq!(context.wallet_number, "01010101010");
        assert_eq!(context.amount, "1");
        assert_eq!(context.order, "123456");

        let context = WalletContext::resolve(&params(Some(""), Some(""), Some("")), &config);
        assert_eq!(context.wallet_number, "01010101010");
        assert_eq!(context.amount, "1");
    }

    #[test]
    fn test_context_malformed_amount_falls_back() {
        let config = GatewayConfig::default();
        for amount in ["abc", "-5", "NaN", "inf"] {
            let context = WalletContext::resolve(&params(None, Some(amount), None), &config);
            assert_eq!(context.amount, "1", "amount {amount:?}");
        }
    }

    #[test]
    fn test_params_from_query() {
        let params = WalletParams::from_query("?amount=50&amount=60&wallet_number=0100");
        assert_eq!(params.amount.as_deref(), Some("50"));
        assert_eq!(params.wallet_number.as_deref(), Some("0100"));
        assert_eq!(params.order, None);

        assert_eq!(WalletParams::from_query(""), WalletParams::default());
        assert_eq!(WalletParams::from_query("&&=&junk"), WalletParams::default());
    }

    #[test]
    fn test_amount_to_cents() {
        assert_eq!(amount_to_cents("50"), Some(5000));
        assert_eq!(amount_to_cents("1"), Some(100));
        assert_eq!(amount_to_cents("12.34"), Some(1234));
        assert_eq!(amount_to_cents("0.1"), Some(10));
        assert_eq!(amount_to_cents("0"), Some(0));
        assert_eq!(amount_to_cents(""), None);
        assert_eq!(amount_to_cents("1e400"), None);
        assert_eq!(amount_to_cents("12abc"), None);
    }

    #[test]
    fn test_normalize_strips_and_truncates() {
        assert_eq!(normalize_wallet_field(WalletField::Mpin, "12a34b56"), "123456");
        assert_eq!(normalize_wallet_field(WalletField::Otp, "1234567890"), "123456");
        assert_eq!(normalize_wallet_field(WalletField::Otp, "--"), "");
    }

    #[test]
    fn test_validation() {
        let errors = validate_wallet(&WalletFormState::default());
        assert_eq!(errors.get("mpin"), Some(MPIN_ERROR));
        assert_eq!(errors.get("otp"), Some(OTP_ERROR));

        let errors = validate_wallet(&WalletFormState {
            mpin: "12345".to_string(),
            otp: "123456".to_string(),
        });
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("mpin"));
    }

    #[test]
    fn test_stripped_input_validates() {
        let mut controller = controller(&WalletParams::default());
        controller.update_field(WalletField::Mpin, "12a34b56");
        controller.update_field(WalletField::Otp, "6 5 4 3 2 1");
        assert!(controller.validate().is_empty());
        assert_eq!(controller.validate(), controller.validate());
    }

    #[test]
    fn test_unknown_field() {
        let mut controller = controller(&WalletParams::default());
        assert!(controller.update_named_field("cvv", "123").is_err());
        assert_eq!(controller.update_named_field("otp", "1x1").unwrap().otp, "11");
    }

    #[test]
    fn test_submit_scenario() {
        let mut controller = controller(&params(None, Some("50"), None));
        controller.update_field(WalletField::Mpin, "111111");
        controller.update_field(WalletField::Otp, "222222");

        let nav = controller.submit().unwrap();
        assert_eq!(nav.target, View::Result);
        let message = nav.message;
        assert!(message.success);
        assert_eq!(message.amount_cents, 5000);
        assert_eq!(message.order, "123456");
        assert_eq!(message.payment_type, Some(PaymentType::MobileWallet));
        assert_eq!(message.wallet_number.as_deref(), Some("01010101010"));
        assert!(message.token.starts_with("mock_wallet_tok_"));
        assert_eq!(message.masked_pan, None);
    }

    #[test]
    fn test_submit_carries_context() {
        let mut controller = controller(&params(Some("01122334455"), Some("7.5"), Some("ord-9")));
        controller.update_field(WalletField::Mpin, "000000");
        controller.update_field(WalletField::Otp, "999999");

        let message = controller.submit().unwrap().message;
        assert_eq!(message.order, "ord-9");
        assert_eq!(message.amount_cents, 750);
        assert_eq!(message.wallet_number.as_deref(), Some("01122334455"));
    }

    #[test]
    fn test_submit_invalid() {
        let mut controller = controller(&WalletParams::default());
        controller.update_field(WalletField::Mpin, "123");
        let errors = controller.submit().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(controller.errors(), &errors);
    }

    #[test]
    fn test_context_query_string() {
        let params = params(Some("0100"), Some("5"), Some("o 1"));
        let context = WalletContext::resolve(&params, &GatewayConfig::default());
        assert_eq!(
            context.to_query_string().unwrap(),
            "wallet_number=0100&amount=5&order=o+1"
        );
    }
}
