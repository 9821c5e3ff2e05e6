//! # Mock Tokens
//!
//! Opaque placeholder credentials issued on every successful submit.
//! Format: `<prefix><epoch millis>_<12 hex chars>`, e.g.
//! `mock_tok_1718000000000_3f9c2a7b1e04`. Not cryptographically meaningful.

use crate::clock::SharedClock;
use uuid::Uuid;

const SUFFIX_LEN: usize = 12;

/// Issues mock tokens with a fixed prefix
#[derive(Clone)]
pub struct TokenIssuer {
    prefix: String,
    clock: SharedClock,
}

impl TokenIssuer {
    pub fn new(prefix: impl Into<String>, clock: SharedClock) -> Self {
        Self {
            prefix: prefix.into(),
            clock,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Issue a fresh token
    pub fn issue(&self) -> String {
        let millis = self.clock.now().timestamp_millis();
        let random = Uuid::new_v4().simple().to_string();
        format!("{}{}_{}", self.prefix, millis, &random[..SUFFIX_LEN])
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
