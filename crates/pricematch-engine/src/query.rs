use pricematch_core::{RawListing, SynonymDictionary};

use crate::similarity::name_similarity;

/// Minimum similarity for a dictionary word to replace a misspelt query.
pub const AUTOCORRECT_CUTOFF: f64 = 0.8;

/// Corrects near-misses such as `"milks"` or `"tomat"` against the known
/// grocery vocabulary.
///
/// The query is trimmed and lowercased first. Known words are returned as
/// is; otherwise the most similar known word scoring at least
/// [`AUTOCORRECT_CUTOFF`] wins, ties going to the alphabetically first word.
/// With no close word the lowercased query is returned unchanged, since it
/// may simply be an item the dictionary does not know.
#[must_use]
pub fn autocorrect_query(query: &str, dictionary: &SynonymDictionary) -> String {
    let query = query.trim().to_lowercase();
    let words = dictionary.known_words();
    if words.binary_search(&query.as_str()).is_ok() {
        return query;
    }

    let mut best: Option<(&str, f64)> = None;
    for word in words {
        let score = name_similarity(word, &query);
        if score >= AUTOCORRECT_CUTOFF && best.is_none_or(|(_, top)| score > top) {
            best = Some((word, score));
        }
    }

    match best {
        Some((word, score)) => {
            tracing::info!(query = %query, corrected = word, score, "auto-corrected query");
            word.to_string()
        }
        None => query,
    }
}

/// Keeps listings whose name mentions the query or one of its synonyms.
///
/// Matching is a case-insensitive substring test. Queries the dictionary
/// does not know use the query itself as the only keyword.
#[must_use]
pub fn keyword_filter(
    listings: Vec<RawListing>,
    query: &str,
    dictionary: &SynonymDictionary,
) -> Vec<RawListing> {
    let keywords = dictionary.keywords_for(query);
    let before = listings.len();

    let kept: Vec<RawListing> = listings
        .into_iter()
        .filter(|listing| {
            let name = listing.name.to_lowercase();
            keywords.iter().any(|kw| name.contains(kw.as_str()))
        })
        .collect();

    let discarded = before - kept.len();
    if discarded > 0 {
        tracing::debug!(query, discarded, kept = kept.len(), "keyword filter removed irrelevant listings");
    }
    kept
}
