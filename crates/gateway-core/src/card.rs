//! # Card Entry
//!
//! Credit-card form: per-keystroke normalization, submit-time validation and
//! the derived artifacts (masked PAN, card type, mock token) forwarded to the
//! result view.

use crate::clock::SharedClock;
use crate::config::GatewayConfig;
use crate::error::{CheckoutError, CheckoutResult, ValidationErrors};
use crate::navigation::{CardArtifacts, Navigation, NavigationMessage};
use crate::normalize::{digits_only, group_digits, is_all_digits, strip_spaces};
use crate::token::TokenIssuer;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

/// Digits in a complete card number
pub const CARD_NUMBER_DIGITS: usize = 16;

/// Literal prefix of a masked PAN
pub const MASK_PREFIX: &str = "**** **** **** ";

const CVV_MAX_DIGITS: usize = 4;
const MONTH_MAX_DIGITS: usize = 2;
const YEAR_MAX_DIGITS: usize = 4;

pub const CARD_NUMBER_ERROR: &str = "Card number must be 16 digits";
pub const CARD_HOLDER_ERROR: &str = "Card holder name is required";
pub const EXP_MONTH_ERROR: &str = "Invalid month";
pub const EXP_YEAR_ERROR: &str = "Invalid year";
pub const CVV_ERROR: &str = "CVV must be 3-4 digits";

/// Fields of the card form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardField {
    CardNumber,
    CardHolderName,
    ExpMonth,
    ExpYear,
    Cvv,
    SaveCard,
}

impl CardField {
    pub const ALL: [CardField; 6] = [
        CardField::CardNumber,
        CardField::CardHolderName,
        CardField::ExpMonth,
        CardField::ExpYear,
        CardField::Cvv,
        CardField::SaveCard,
    ];

    /// Form field name
    pub fn as_str(&self) -> &'static str {
        match self {
            CardField::CardNumber => "cardNumber",
            CardField::CardHolderName => "cardHolderName",
            CardField::ExpMonth => "expMonth",
            CardField::ExpYear => "expYear",
            CardField::Cvv => "cvv",
            CardField::SaveCard => "saveCard",
        }
    }
}

impl FromStr for CardField {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CheckoutError::UnknownField {
                form: "card",
                field: s.to_string(),
            })
    }
}

/// Normalize raw input for a card field
///
/// `saveCard` is a checkbox: `"true"`, `"on"` and `"1"` mean checked, and the
/// normalized value is `"true"` or `"false"`.
pub fn normalize_card_field(field: CardField, raw: &str) -> String {
    match field {
        CardField::CardNumber => group_digits(&digits_only(raw, CARD_NUMBER_DIGITS)),
        CardField::Cvv => digits_only(raw, CVV_MAX_DIGITS),
        CardField::ExpMonth => digits_only(raw, MONTH_MAX_DIGITS),
        CardField::ExpYear => digits_only(raw, YEAR_MAX_DIGITS),
        CardField::CardHolderName => raw.to_string(),
        CardField::SaveCard => is_checked(raw).to_string(),
    }
}

fn is_checked(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "on" | "1")
}

/// Card form as displayed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardFormState {
    /// Digits grouped by four, e.g. `4111 1111 1111 1111`
    pub card_number: String,
    pub card_holder_name: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvv: String,
    pub save_card: bool,
}

impl CardFormState {
    /// Card number without display separators
    pub fn card_digits(&self) -> String {
        strip_spaces(&self.card_number)
    }
}

/// Card scheme detected from the leading digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Visa,
    Mastercard,
    Card,
}

impl CardType {
    /// `4…` is Visa, `5…` is Mastercard, anything else is a generic card
    pub fn detect(digits: &str) -> Self {
        if digits.starts_with('4') {
            CardType::Visa
        } else if digits.starts_with('5') {
            CardType::Mastercard
        } else {
            CardType::Card
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Visa => "VISA",
            CardType::Mastercard => "MASTERCARD",
            CardType::Card => "CARD",
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mask all but the last four digits: `**** **** **** 1111`
pub fn mask_pan(digits: &str) -> String {
    let count = digits.chars().count();
    let last_four: String = digits.chars().skip(count.saturating_sub(4)).collect();
    format!("{}{}", MASK_PREFIX, last_four)
}

/// Validate a card form
///
/// Every field is checked; all failures are reported together.
/// `year_window` is how many years past `current_year` an expiry may be.
pub fn validate_card(
    state: &CardFormState,
    current_year: i32,
    year_window: i32,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let digits = state.card_digits();
    if digits.len() != CARD_NUMBER_DIGITS || !is_all_digits(&digits) {
        errors.insert(CardField::CardNumber.as_str(), CARD_NUMBER_ERROR);
    }

    if state.card_holder_name.trim().is_empty() {
        errors.insert(CardField::CardHolderName.as_str(), CARD_HOLDER_ERROR);
    }

    match parse_number(&state.exp_month) {
        Some(month) if (1..=12).contains(&month) => {}
        _ => errors.insert(CardField::ExpMonth.as_str(), EXP_MONTH_ERROR),
    }

    let latest_year = current_year.saturating_add(year_window);
    match parse_number(&state.exp_year) {
        Some(year) if (current_year..=latest_year).contains(&year) => {}
        _ => errors.insert(CardField::ExpYear.as_str(), EXP_YEAR_ERROR),
    }

    if !(3..=CVV_MAX_DIGITS).contains(&state.cvv.len()) || !is_all_digits(&state.cvv) {
        errors.insert(CardField::Cvv.as_str(), CVV_ERROR);
    }

    errors
}

fn parse_number(value: &str) -> Option<i32> {
    if is_all_digits(value) {
        value.parse().ok()
    } else {
        None
    }
}

/// Controller behind the card entry view
pub struct CardEntryController {
    state: CardFormState,
    errors: ValidationErrors,
    clock: SharedClock,
    tokens: TokenIssuer,
    order: String,
    amount_cents: i64,
    year_window: i32,
}

impl CardEntryController {
    pub fn new(config: &GatewayConfig, clock: SharedClock) -> Self {
        Self {
            state: CardFormState::default(),
            errors: ValidationErrors::new(),
            tokens: TokenIssuer::new(config.card_token_prefix.clone(), clock.clone()),
            clock,
            order: config.demo_order.clone(),
            amount_cents: config.demo_amount_cents,
            year_window: config.expiry_year_window,
        }
    }

    pub fn state(&self) -> &CardFormState {
        &self.state
    }

    /// Errors from the last submit
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Store normalized input for a field
    pub fn update_field(&mut self, field: CardField, raw: &str) -> &CardFormState {
        let value = normalize_card_field(field, raw);
        match field {
            CardField::CardNumber => self.state.card_number = value,
            CardField::CardHolderName => self.state.card_holder_name = value,
            CardField::ExpMonth => self.state.exp_month = value,
            CardField::ExpYear => self.state.exp_year = value,
            CardField::Cvv => self.state.cvv = value,
            CardField::SaveCard => self.state.save_card = is_checked(&value),
        }
        &self.state
    }

    /// Like [`update_field`](Self::update_field), addressing the field by its form name
    pub fn update_named_field(&mut self, name: &str, raw: &str) -> CheckoutResult<&CardFormState> {
        let field = name.parse::<CardField>()?;
        Ok(self.update_field(field, raw))
    }

    pub fn set_save_card(&mut self, save_card: bool) -> &CardFormState {
        self.state.save_card = save_card;
        &self.state
    }

    pub fn validate(&self) -> ValidationErrors {
        validate_card(&self.state, self.clock.current_year(), self.year_window)
    }

    /// Validate and, if clean, build the navigation to the result view
    pub fn submit(&mut self) -> Result<Navigation, ValidationErrors> {
        self.errors = self.validate();
        if !self.errors.is_empty() {
            debug!(failed = self.errors.len(), "Card form rejected");
            return Err(self.errors.clone());
        }

        let digits = self.state.card_digits();
        let card = CardArtifacts {
            masked_pan: mask_pan(&digits),
            card_type: CardType::detect(&digits),
            card_holder: self.state.card_holder_name.clone(),
            exp_month: self.state.exp_month.clone(),
            exp_year: self.state.exp_year.clone(),
            save_card: self.state.save_card,
        };

        info!(
            masked_pan = %card.masked_pan,
            card_type = %card.card_type,
            order = %self.order,
            "Card payment approved"
        );

        let token = self.tokens.issue();
        let message =
            NavigationMessage::approved(&self.order, self.amount_cents, token).with_card(card);
        Ok(Navigation::to_result(message))
    }
}
