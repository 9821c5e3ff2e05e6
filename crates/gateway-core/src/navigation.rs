//! # Navigation Contract
//!
//! The query-string payload carried from an entry view to the result view.
//! It is the only channel between controllers: built once inside a
//! successful submit, encoded into the target address, decoded once by the
//! destination.
//!
//! ```text
//!  /card  ──submit ok──┐
//!                      ├──▶ /result?success=true&order=…&amount_cents=…&token=…
//!  /wallet ─submit ok──┘
//! ```
//!
//! Field order below is the key order on the wire.

use crate::card::CardType;
use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Views of the checkout flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Card,
    Wallet,
    Result,
}

impl View {
    /// Address of the view, relative to the gateway root
    pub fn path(&self) -> &'static str {
        match self {
            View::Card => "/card",
            View::Wallet => "/wallet",
            View::Result => "/result",
        }
    }
}

/// Payment method marker for non-card flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    MobileWallet,
}

/// Card-specific artifacts forwarded to the result view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardArtifacts {
    pub masked_pan: String,
    pub card_type: CardType,
    pub card_holder: String,
    pub exp_month: String,
    pub exp_year: String,
    pub save_card: bool,
}

/// Key/value payload between views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationMessage {
    /// Outcome flag; encoded as `"true"` / `"false"`
    pub success: bool,
    pub order: String,
    pub amount_cents: i64,
    pub token: String,

    // Card flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked_pan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CardType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_holder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_card: Option<bool>,

    // Wallet flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
}

impl NavigationMessage {
    /// Message for an approved payment without flow-specific fields
    pub fn approved(order: impl Into<String>, amount_cents: i64, token: impl Into<String>) -> Self {
        Self {
            success: true,
            order: order.into(),
            amount_cents,
            token: token.into(),
            masked_pan: None,
            card_type: None,
            card_holder: None,
            exp_month: None,
            exp_year: None,
            save_card: None,
            wallet_number: None,
            payment_type: None,
        }
    }

    /// Builder: attach card artifacts
    pub fn with_card(mut self, card: CardArtifacts) -> Self {
        self.masked_pan = Some(card.masked_pan);
        self.card_type = Some(card.card_type);
        self.card_holder = Some(card.card_holder);
        self.exp_month = Some(card.exp_month);
        self.exp_year = Some(card.exp_year);
        self.save_card = Some(card.save_card);
        self
    }

    /// Builder: attach wallet details
    pub fn with_wallet(mut self, wallet_number: impl Into<String>) -> Self {
        self.wallet_number = Some(wallet_number.into());
        self.payment_type = Some(PaymentType::MobileWallet);
        self
    }

    /// Encode as an `application/x-www-form-urlencoded` query string
    pub fn to_query_string(&self) -> CheckoutResult<String> {
        serde_urlencoded::to_string(self).map_err(|e| CheckoutError::Serialization(e.to_string()))
    }

    /// Decode from a query string (without the leading `?`)
    pub fn from_query_string(query: &str) -> CheckoutResult<Self> {
        serde_urlencoded::from_str(query).map_err(|e| CheckoutError::Serialization(e.to_string()))
    }
}

/// Decode a view's incoming query string into key/value pairs, in order
///
/// Never fails: a query that cannot be decoded reads as empty.
pub fn query_pairs(query: &str) -> Vec<(String, String)> {
    let query = query.trim_start_matches('?');
    serde_urlencoded::from_str(query).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring undecodable query string");
        Vec::new()
    })
}

/// First value of `key`; later repeats are ignored
pub fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

/// A request to move to another view carrying a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub target: View,
    pub message: NavigationMessage,
}

impl Navigation {
    /// Navigation to the terminal result view
    pub fn to_result(message: NavigationMessage) -> Self {
        Self {
            target: View::Result,
            message,
        }
    }

    /// Target address including the encoded message, e.g. `/result?success=true&…`
    pub fn location(&self) -> CheckoutResult<String> {
        Ok(format!(
            "{}?{}",
            self.target.path(),
            self.message.to_query_string()?
        ))
    }
}
