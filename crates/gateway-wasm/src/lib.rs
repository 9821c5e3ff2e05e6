//! # gateway-wasm
//!
//! WebAssembly bindings for mock-gateway-rs.
//!
//! This crate provides WASM-compatible functions for:
//! - Formatting card, expiry, CVV, MPIN and OTP input as it is typed
//! - Card-type detection and PAN masking for previews
//! - Running the full card/wallet controllers in the browser
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { normalize, CardForm } from 'mock-gateway-wasm';
//!
//! await init();
//!
//! input.value = normalize('card', 'cardNumber', input.value);
//!
//! const form = new CardForm(); // or new CardForm(yearWindow) to match the server
//! form.update_field('cardNumber', '4111111111111111');
//! // ...
//! window.location.assign(form.submit()); // throws the error map when invalid
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use chrono::{DateTime, Utc};
use gateway_core::{
    normalize_field, CardEntryController, CardFormState, CardType, Clock, FormKind, GatewayConfig,
    SharedClock, WalletContext, WalletEntryController, WalletFormState, WalletParams,
    MAX_EXPIRY_YEAR_WINDOW,
};
use std::sync::Arc;
use wasm_bindgen::prelude::*;

/// Clock backed by the browser's `Date`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
}

fn browser_clock() -> SharedClock {
    Arc::new(BrowserClock)
}

/// Default settings, with the expiry window overridden when given
fn config_with_window(year_window: Option<i32>) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    if let Some(window) = year_window {
        config.expiry_year_window = window.clamp(0, MAX_EXPIRY_YEAR_WINDOW);
    }
    config
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Normalize a field value as typed, e.g. `normalize("card", "cardNumber", "41111111")`
#[wasm_bindgen]
pub fn normalize(form: &str, field: &str, raw: &str) -> Result<String, JsValue> {
    let form: FormKind = form.parse().map_err(to_js_error)?;
    normalize_field(form, field, raw).map_err(to_js_error)
}

/// `VISA`, `MASTERCARD` or `CARD`
#[wasm_bindgen]
pub fn detect_card_type(card_number: &str) -> String {
    CardType::detect(&digits(card_number)).to_string()
}

/// Masked PAN preview, e.g. `**** **** **** 1111`
#[wasm_bindgen]
pub fn mask_pan(card_number: &str) -> String {
    gateway_core::mask_pan(&digits(card_number))
}

fn digits(card_number: &str) -> String {
    card_number.chars().filter(char::is_ascii_digit).collect()
}

/// Validate a card form object (`{cardNumber, cardHolderName, ...}`); returns the error map
///
/// `year_window` defaults to the gateway default when omitted.
#[wasm_bindgen]
pub fn validate_card_form(state: JsValue, year_window: Option<i32>) -> Result<JsValue, JsValue> {
    let state: CardFormState = serde_wasm_bindgen::from_value(state)
        .map_err(|e| JsValue::from_str(&format!("Invalid card form: {}", e)))?;
    let errors = gateway_core::validate_card(
        &state,
        BrowserClock.current_year(),
        config_with_window(year_window).expiry_year_window,
    );
    serde_wasm_bindgen::to_value(&errors).map_err(to_js_error)
}

/// Validate a wallet form object (`{mpin, otp}`); returns the error map
#[wasm_bindgen]
pub fn validate_wallet_form(state: JsValue) -> Result<JsValue, JsValue> {
    let state: WalletFormState = serde_wasm_bindgen::from_value(state)
        .map_err(|e| JsValue::from_str(&format!("Invalid wallet form: {}", e)))?;
    serde_wasm_bindgen::to_value(&gateway_core::validate_wallet(&state)).map_err(to_js_error)
}

/// Card entry controller for a browser page
#[wasm_bindgen]
pub struct CardForm {
    inner: CardEntryController,
}

#[wasm_bindgen]
impl CardForm {
    #[wasm_bindgen(constructor)]
    pub fn new(year_window: Option<i32>) -> Self {
        Self {
            inner: CardEntryController::new(&config_with_window(year_window), browser_clock()),
        }
    }

    /// Store a field and return its normalized display value
    pub fn update_field(&mut self, field: &str, raw: &str) -> Result<String, JsValue> {
        self.inner.update_named_field(field, raw).map_err(to_js_error)?;
        normalize_field(FormKind::Card, field, raw).map_err(to_js_error)
    }

    pub fn set_save_card(&mut self, save_card: bool) {
        self.inner.set_save_card(save_card);
    }

    /// Current form state as a plain object
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.state()).map_err(to_js_error)
    }

    /// Result-view address on success; throws the error map otherwise
    pub fn submit(&mut self) -> Result<String, JsValue> {
        match self.inner.submit() {
            Ok(navigation) => navigation.location().map_err(to_js_error),
            Err(errors) => Err(serde_wasm_bindgen::to_value(&errors).map_err(to_js_error)?),
        }
    }
}

impl Default for CardForm {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Wallet entry controller for a browser page
#[wasm_bindgen]
pub struct WalletForm {
    inner: WalletEntryController,
}

#[wasm_bindgen]
impl WalletForm {
    /// Build from the page's own query string
    #[wasm_bindgen(constructor)]
    pub fn new(query: &str) -> Self {
        let params = WalletParams::from_query(query);
        let config = GatewayConfig::default();
        let context = WalletContext::resolve(&params, &config);
        Self {
            inner: WalletEntryController::new(context, &config, browser_clock()),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn wallet_number(&self) -> String {
        self.inner.context().wallet_number.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn amount(&self) -> String {
        self.inner.context().amount.clone()
    }

    /// Store a field and return its normalized value
    pub fn update_field(&mut self, field: &str, raw: &str) -> Result<String, JsValue> {
        let state = self.inner.update_named_field(field, raw).map_err(to_js_error)?;
        Ok(if field == "mpin" { state.mpin.clone() } else { state.otp.clone() })
    }

    /// Result-view address on success; throws the error map otherwise
    pub fn submit(&mut self) -> Result<String, JsValue> {
        match self.inner.submit() {
            Ok(navigation) => navigation.location().map_err(to_js_error),
            Err(errors) => Err(serde_wasm_bindgen::to_value(&errors).map_err(to_js_error)?),
        }
    }
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
