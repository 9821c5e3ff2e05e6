//! # Checkout Error Types
//!
//! Typed error handling for the mock gateway.
//!
//! Field validation failures are the only domain error and are carried as
//! [`ValidationErrors`], a map from field name to message. Everything else
//! (unknown field names, bad configuration, query encoding) is a
//! [`CheckoutError`].

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name → human-readable message.
///
/// An empty map means the form is valid. Recomputed from scratch on every
/// submit, so there is no partial state to reconcile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("{} field(s) failed validation", .0.len())]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, &'static str>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record an error for a field, replacing any earlier one
    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        self.0.insert(field, message);
    }

    /// Message for a field, if it failed
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    /// `Ok(())` when empty, otherwise the errors themselves
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Core error type for everything that is not a field validation failure
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more form fields failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Field name not part of the form
    #[error("Unknown field `{field}` for {form} form")]
    UnknownField { form: &'static str, field: String },

    /// Form name not recognised
    #[error("Unknown form: {0}")]
    UnknownForm(String),

    /// Configuration errors (unreadable or invalid gateway config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Query string encoding/decoding error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CheckoutError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Validation(_) => 422,
            CheckoutError::UnknownField { .. } => 400,
            CheckoutError::UnknownForm(_) => 400,
            CheckoutError::Configuration(_) => 500,
            CheckoutError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
