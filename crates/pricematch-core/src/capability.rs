//! Seams for the optional model-backed capabilities consumed by the engine.
//!
//! Both capabilities are advisory: the engine applies a deadline to every
//! call and falls back to deterministic behaviour on any
//! [`CapabilityError`], so implementations never need to retry forever or
//! swallow their own failures.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::listings::NormalizedItem;

/// A candidate cross-retailer pairing proposed by a [`MatchSuggester`].
///
/// Indices are signed so that out-of-range answers (including negative ones)
/// survive the boundary and are rejected by the matcher, not the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedPair {
    pub a_idx: i64,
    pub b_idx: i64,
}

impl SuggestedPair {
    #[must_use]
    pub fn new(a_idx: i64, b_idx: i64) -> Self {
        Self { a_idx, b_idx }
    }
}

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("capability is not configured")]
    Disabled,

    #[error("capability did not answer within {0:?}")]
    Timeout(Duration),

    #[error("capability transport failure: {0}")]
    Transport(String),

    #[error("capability rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("capability returned malformed output: {0}")]
    Malformed(String),
}

/// Proposes candidate pairs between two retailers' item lists.
pub trait MatchSuggester: Send + Sync {
    /// Returns index pairs `(index into list_a, index into list_b)`.
    ///
    /// # Errors
    ///
    /// Any [`CapabilityError`]; the caller treats it as "no suggestions".
    fn suggest(
        &self,
        list_a: &[NormalizedItem],
        list_b: &[NormalizedItem],
    ) -> impl Future<Output = Result<Vec<SuggestedPair>, CapabilityError>> + Send;
}

/// Decides which items are relevant to what the shopper actually asked for
/// (e.g. drops "Onion Pakoda" for the query "onion").
pub trait IntentFilter: Send + Sync {
    /// Returns the indices into `items` that should be kept.
    ///
    /// # Errors
    ///
    /// Any [`CapabilityError`]; the caller then keeps every item.
    fn keep(
        &self,
        query: &str,
        items: &[NormalizedItem],
    ) -> impl Future<Output = Result<Vec<usize>, CapabilityError>> + Send;
}

/// Stand-in used when no capability is configured. Always answers
/// [`CapabilityError::Disabled`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Unassisted;

impl MatchSuggester for Unassisted {
    async fn suggest(
        &self,
        _list_a: &[NormalizedItem],
        _list_b: &[NormalizedItem],
    ) -> Result<Vec<SuggestedPair>, CapabilityError> {
        Err(CapabilityError::Disabled)
    }
}

impl IntentFilter for Unassisted {
    async fn keep(
        &self,
        _query: &str,
        _items: &[NormalizedItem],
    ) -> Result<Vec<usize>, CapabilityError> {
        Err(CapabilityError::Disabled)
    }
}
