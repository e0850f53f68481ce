//! Cross-retailer item matching.
//!
//! Matching runs in two passes over a pair of item lists:
//!
//! 1. **Assisted**: candidate index pairs from a
//!    [`MatchSuggester`](pricematch_core::MatchSuggester) are checked in the
//!    order given. A candidate is accepted only when both indices are in
//!    range and unused, the units agree, and the quantities sit within the
//!    tolerance band (see [`within_tolerance`]).
//! 2. **Fallback**: every still-unused item of list A, in order, takes the
//!    first unused item of list B with the same bucket and a name similarity
//!    strictly above [`FALLBACK_MIN_SIMILARITY`]. Greedy first-fit with no
//!    backtracking, so results depend only on input order.
//!
//! Each index takes part in at most one pair.

use pricematch_core::{MatchPair, NormalizedItem, Side, SuggestedPair};

use crate::similarity::name_similarity;

/// Name similarity a fallback candidate must exceed (strictly).
pub const FALLBACK_MIN_SIMILARITY: f64 = 0.3;

/// Quantities below this (in base units) use the narrow tolerance band.
pub const SMALL_PACK_LIMIT: f64 = 300.0;
pub const SMALL_PACK_TOLERANCE: f64 = 60.0;
pub const LARGE_PACK_TOLERANCE: f64 = 150.0;

/// Outcome of checking one suggested candidate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateVerdict {
    Accepted { a_idx: usize, b_idx: usize },
    /// An index is negative or past the end of its list.
    OutOfRange,
    /// One of the two items is already part of an accepted pair.
    IndexReused,
    UnitMismatch,
    OutsideTolerance,
}

/// Pairs accepted for one `(A, B)` list combination, in acceptance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    pub pairs: Vec<MatchPair>,
    /// `(index into A, index into B)` for each entry of `pairs`.
    pub indices: Vec<(usize, usize)>,
}

/// Whether quantity `b` is close enough to `a` to count as the same pack
/// size. `a` sets the band: below [`SMALL_PACK_LIMIT`] the difference may be
/// at most [`SMALL_PACK_TOLERANCE`], otherwise at most [`LARGE_PACK_TOLERANCE`].
#[must_use]
pub fn within_tolerance(a: f64, b: f64) -> bool {
    let diff = (a - b).abs();
    if a < SMALL_PACK_LIMIT {
        diff <= SMALL_PACK_TOLERANCE
    } else {
        diff <= LARGE_PACK_TOLERANCE
    }
}

/// Decides whether a suggested candidate may become a pair.
///
/// `used_a` and `used_b` flag items already paired; an index past the end of
/// either slice counts as unused.
#[must_use]
pub fn check_candidate(
    list_a: &[NormalizedItem],
    list_b: &[NormalizedItem],
    candidate: SuggestedPair,
    used_a: &[bool],
    used_b: &[bool],
) -> CandidateVerdict {
    let (Some(a_idx), Some(b_idx)) = (
        in_range(candidate.a_idx, list_a.len()),
        in_range(candidate.b_idx, list_b.len()),
    ) else {
        return CandidateVerdict::OutOfRange;
    };
    let is_used = |used: &[bool], idx: usize| used.get(idx).copied().unwrap_or(false);
    if is_used(used_a, a_idx) || is_used(used_b, b_idx) {
        return CandidateVerdict::IndexReused;
    }

    let (a, b) = (&list_a[a_idx], &list_b[b_idx]);
    if a.norm_unit != b.norm_unit {
        CandidateVerdict::UnitMismatch
    } else if !within_tolerance(a.norm_value, b.norm_value) {
        CandidateVerdict::OutsideTolerance
    } else {
        CandidateVerdict::Accepted { a_idx, b_idx }
    }
}

fn in_range(idx: i64, len: usize) -> Option<usize> {
    usize::try_from(idx).ok().filter(|&i| i < len)
}

/// Builds a [`MatchPair`], naming the side with the strictly lower unit price.
#[must_use]
pub fn price_pair(item_a: &NormalizedItem, item_b: &NormalizedItem) -> MatchPair {
    let unit_price_a = item_a.unit_price();
    let unit_price_b = item_b.unit_price();
    let winner = if unit_price_a < unit_price_b {
        Side::A
    } else if unit_price_b < unit_price_a {
        Side::B
    } else {
        Side::Tie
    };

    MatchPair {
        item_a: item_a.clone(),
        item_b: item_b.clone(),
        unit_price_a,
        unit_price_b,
        winner,
    }
}

/// Matches two retailers' items using `suggestions` first, then the greedy
/// bucket-and-name fallback. Pass an empty slice when no suggestions are
/// available; the fallback alone still runs.
#[must_use]
pub fn match_items(
    list_a: &[NormalizedItem],
    list_b: &[NormalizedItem],
    suggestions: &[SuggestedPair],
) -> MatchOutcome {
    let mut used_a = vec![false; list_a.len()];
    let mut used_b = vec![false; list_b.len()];
    let mut outcome = MatchOutcome::default();

    for &candidate in suggestions {
        let verdict = check_candidate(list_a, list_b, candidate, &used_a, &used_b);
        let CandidateVerdict::Accepted { a_idx, b_idx } = verdict else {
            tracing::debug!(
                a_idx = candidate.a_idx,
                b_idx = candidate.b_idx,
                ?verdict,
                "discarded suggested pair"
            );
            continue;
        };
        accept(&mut outcome, list_a, list_b, a_idx, b_idx);
        used_a[a_idx] = true;
        used_b[b_idx] = true;
    }
    let assisted = outcome.pairs.len();

    for (a_idx, item_a) in list_a.iter().enumerate() {
        if used_a[a_idx] {
            continue;
        }
        let found = list_b.iter().enumerate().find(|(b_idx, item_b)| {
            !used_b[*b_idx]
                && item_b.bucket == item_a.bucket
                && name_similarity(&item_a.name, &item_b.name) > FALLBACK_MIN_SIMILARITY
        });
        if let Some((b_idx, _)) = found {
            accept(&mut outcome, list_a, list_b, a_idx, b_idx);
            used_a[a_idx] = true;
            used_b[b_idx] = true;
        }
    }

    tracing::debug!(
        assisted,
        fallback = outcome.pairs.len() - assisted,
        items_a = list_a.len(),
        items_b = list_b.len(),
        "matched item lists"
    );
    outcome
}

fn accept(
    outcome: &mut MatchOutcome,
    list_a: &[NormalizedItem],
    list_b: &[NormalizedItem],
    a_idx: usize,
    b_idx: usize,
) {
    outcome.pairs.push(price_pair(&list_a[a_idx], &list_b[b_idx]));
    outcome.indices.push((a_idx, b_idx));
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
