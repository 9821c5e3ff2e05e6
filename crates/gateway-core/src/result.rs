//! # Result View
//!
//! Terminal view of the checkout flow. Reads the `success` flag and nothing
//! else; any value but the literal `"true"` (including no value) is a decline.
//! Decline is only reachable by passing `success` directly, since both entry
//! flows always report success once their forms validate.

use crate::navigation::{first_value, query_pairs};
use serde::{Deserialize, Serialize};

const THANK_YOU: &str = "Thank you for using the online payment service.";

/// Incoming query parameters of the result view
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResultParams {
    #[serde(default)]
    pub success: Option<String>,
}

impl ResultParams {
    /// Read from the view's query string; a repeated `success` keeps its first value
    pub fn from_query(query: &str) -> Self {
        Self {
            success: first_value(&query_pairs(query), "success"),
        }
    }
}

/// Terminal outcome shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Approved,
    Declined,
}

impl Outcome {
    /// `Some("true")` is approval; everything else declines
    pub fn from_flag(success: Option<&str>) -> Self {
        match success {
            Some("true") => Outcome::Approved,
            _ => Outcome::Declined,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Outcome::Approved)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Outcome::Approved => "Approved",
            Outcome::Declined => "Declined",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Approved => "Your transaction has been approved successfully.",
            Outcome::Declined => {
                "The transaction you have attempted to make has been declined. \
                 If this problem persists, please contact your service provider."
            }
        }
    }

    pub fn thank_you(&self) -> &'static str {
        THANK_YOU
    }
}

/// Controller behind the result view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultController {
    outcome: Outcome,
}

impl ResultController {
    pub fn new(params: &ResultParams) -> Self {
        Self {
            outcome: Outcome::from_flag(params.success.as_deref()),
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}
