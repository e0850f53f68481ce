//! [`MatchSuggester`] and [`IntentFilter`] backed by [`LlmClient`].
//!
//! The model's answer is untrusted: the envelope must be an object with the
//! expected array, and each entry is validated on its own. Entries that are
//! not integer indices are dropped, while range checks are left to the
//! engine, which discards out-of-range pairs and indices itself.

use pricematch_core::{CapabilityError, IntentFilter, MatchSuggester, NormalizedItem, SuggestedPair};
use serde_json::Value;

use crate::client::LlmClient;
use crate::error::LlmError;
use crate::prompt::{filter_prompt, match_prompt, FILTER_SYSTEM_PROMPT, MATCH_SYSTEM_PROMPT};

const MATCH_TEMPERATURE: f64 = 0.1;
const MATCH_MAX_TOKENS: u32 = 6000;
const FILTER_TEMPERATURE: f64 = 0.0;
const FILTER_MAX_TOKENS: u32 = 1000;

impl MatchSuggester for LlmClient {
    async fn suggest(
        &self,
        list_a: &[NormalizedItem],
        list_b: &[NormalizedItem],
    ) -> Result<Vec<SuggestedPair>, CapabilityError> {
        let prompt = match_prompt(list_a, list_b);
        let answer = self
            .chat_json(MATCH_SYSTEM_PROMPT, &prompt, MATCH_TEMPERATURE, MATCH_MAX_TOKENS)
            .await?;
        Ok(parse_pairs(&answer)?)
    }
}

impl IntentFilter for LlmClient {
    async fn keep(
        &self,
        query: &str,
        items: &[NormalizedItem],
    ) -> Result<Vec<usize>, CapabilityError> {
        let prompt = filter_prompt(query, items);
        let answer = self
            .chat_json(FILTER_SYSTEM_PROMPT, &prompt, FILTER_TEMPERATURE, FILTER_MAX_TOKENS)
            .await?;
        Ok(parse_keep_indices(&answer)?)
    }
}

/// Reads `{"pairs": [{"a_id": .., "b_id": ..}, ..]}`. A missing `pairs` key
/// means no suggestions.
///
/// # Errors
///
/// [`LlmError::Shape`] when the answer is not an object or `pairs` is not
/// an array.
pub fn parse_pairs(answer: &Value) -> Result<Vec<SuggestedPair>, LlmError> {
    let object = answer
        .as_object()
        .ok_or_else(|| LlmError::Shape("answer is not a JSON object".to_string()))?;
    let Some(pairs) = object.get("pairs") else {
        return Ok(Vec::new());
    };
    let pairs = pairs
        .as_array()
        .ok_or_else(|| LlmError::Shape("'pairs' is not an array".to_string()))?;

    let parsed: Vec<SuggestedPair> = pairs
        .iter()
        .filter_map(|record| {
            let a_idx = record.get("a_id").and_then(as_index)?;
            let b_idx = record.get("b_id").and_then(as_index)?;
            Some(SuggestedPair::new(a_idx, b_idx))
        })
        .collect();

    if parsed.len() < pairs.len() {
        tracing::debug!(
            dropped = pairs.len() - parsed.len(),
            "dropped malformed pair records"
        );
    }
    Ok(parsed)
}

/// Reads `{"keep_indices": [..]}`. Negative or non-integer entries are
/// dropped.
///
/// # Errors
///
/// [`LlmError::Shape`] when `keep_indices` is missing or not an array.
/// A missing key is treated as a malformed answer rather than "keep
/// nothing", so the engine keeps every item.
pub fn parse_keep_indices(answer: &Value) -> Result<Vec<usize>, LlmError> {
    let indices = answer
        .get("keep_indices")
        .and_then(Value::as_array)
        .ok_or_else(|| LlmError::Shape("'keep_indices' is missing or not an array".to_string()))?;

    Ok(indices
        .iter()
        .filter_map(as_index)
        .filter_map(|idx| usize::try_from(idx).ok())
        .collect())
}

/// Accepts integers and integer strings (`3`, `"3"`).
fn as_index(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
