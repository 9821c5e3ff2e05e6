//! # gateway-core
//!
//! Core types for the mock payment gateway.
//!
//! This crate provides:
//! - `CardEntryController` and `WalletEntryController` for the two entry flows
//! - `ResultController` for the terminal Approved/Declined view
//! - `NavigationMessage`, the typed query-string contract between views
//! - `Clock` and `TokenIssuer` for injectable time and mock tokens
//! - `ValidationErrors` and `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use gateway_core::{CardEntryController, CardField, FixedClock, GatewayConfig};
//! use std::sync::Arc;
//!
//! let clock = Arc::new(FixedClock::at_year(2024));
//! let mut card = CardEntryController::new(&GatewayConfig::default(), clock);
//! card.update_field(CardField::CardNumber, "4111111111111111");
//! card.update_field(CardField::CardHolderName, "Jane Doe");
//! card.update_field(CardField::ExpMonth, "06");
//! card.update_field(CardField::ExpYear, "2025");
//! card.update_field(CardField::Cvv, "123");
//!
//! let navigation = card.submit().unwrap();
//! assert!(navigation.location().unwrap().starts_with("/result?success=true"));
//! ```

pub mod card;
pub mod clock;
pub mod config;
pub mod error;
pub mod navigation;
pub mod normalize;
pub mod result;
pub mod token;
pub mod wallet;

// Re-exports for convenience
pub use card::{
    mask_pan, normalize_card_field, validate_card, CardEntryController, CardField, CardFormState,
    CardType,
};
pub use clock::{system_clock, Clock, FixedClock, SharedClock, SystemClock};
pub use config::{GatewayConfig, MAX_EXPIRY_YEAR_WINDOW};
pub use error::{CheckoutError, CheckoutResult, ValidationErrors};
pub use navigation::{CardArtifacts, Navigation, NavigationMessage, PaymentType, View};
pub use result::{Outcome, ResultController, ResultParams};
pub use token::TokenIssuer;
pub use wallet::{
    amount_to_cents, normalize_wallet_field, validate_wallet, WalletContext, WalletEntryController,
    WalletField, WalletFormState, WalletParams,
};

/// Form a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Card,
    Wallet,
}

impl std::str::FromStr for FormKind {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(FormKind::Card),
            "wallet" => Ok(FormKind::Wallet),
            other => Err(CheckoutError::UnknownForm(other.to_string())),
        }
    }
}

/// Normalize a raw value for a named field of a named form
///
/// The stateless counterpart of the controllers' `update_field`, for
/// presentation layers that format input as it is typed.
pub fn normalize_field(form: FormKind, field: &str, raw: &str) -> CheckoutResult<String> {
    match form {
        FormKind::Card => Ok(normalize_card_field(field.parse()?, raw)),
        FormKind::Wallet => Ok(normalize_wallet_field(field.parse()?, raw)),
    }
}
