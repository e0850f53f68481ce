//! Prompt text for the two model-backed capabilities.

use std::fmt::Write as _;

use pricematch_core::NormalizedItem;
use serde_json::json;

pub const MATCH_SYSTEM_PROMPT: &str = "You are a JSON-only assistant.";
pub const FILTER_SYSTEM_PROMPT: &str =
    "You are a strict data cleaning assistant. JSON output only.";

fn describe(items: &[NormalizedItem]) -> serde_json::Value {
    items
        .iter()
        .enumerate()
        .map(|(id, item)| {
            json!({
                "id": id,
                "name": item.name,
                "size_hint": item.bucket,
                "real_qty": item.quantity_label(),
            })
        })
        .collect()
}

/// Asks for cross-retailer pairs as `{"pairs": [{"a_id": .., "b_id": ..}]}`.
#[must_use]
pub fn match_prompt(list_a: &[NormalizedItem], list_b: &[NormalizedItem]) -> String {
    let source_a = list_a.first().map_or("A", |i| i.source.as_str());
    let source_b = list_b.first().map_or("B", |i| i.source.as_str());

    format!(
        r#"You are a grocery matcher.

List A ({source_a}): {list_a}
List B ({source_b}): {list_b}

TASK: output the pairs of items that are the same product in the same pack size.

MATCHING RULES:
1. Match by 'size_hint': items with the same size_hint match even when 'real_qty' differs (450ml vs 500ml).
2. Match by name: ignore brands for commodities such as eggs or onions. "Farm Fresh Eggs" matches "White Eggs" when the quantity matches.
3. Be exhaustive: find as many pairs as possible. Use each item at most once.

OUTPUT FORMAT:
{{"pairs": [{{"a_id": 0, "b_id": 1}}]}}"#,
        list_a = describe(list_a),
        list_b = describe(list_b),
    )
}

/// Asks which items fit the shopper's intent as `{"keep_indices": [..]}`.
#[must_use]
pub fn filter_prompt(query: &str, items: &[NormalizedItem]) -> String {
    let mut listing = String::new();
    for (idx, item) in items.iter().enumerate() {
        let _ = writeln!(listing, "{idx}: {}", item.name);
    }

    format!(
        r#"User query: "{query}"

TASK: identify which products in the list below match what the user is shopping for.

FILTERING RULES:
1. Processed or cooked: for a raw ingredient (e.g. "onion", "chicken") remove cooked dishes and snacks ("Onion Pakoda", "Butter Chicken", "Chips").
2. Distinct varieties: for a generic item remove varieties that need their own query ("Spring Onion", "Leeks"). Keep subtypes such as "Red Onion" or "Baby Onion".
3. Derivatives: remove pastes, powders, oils and ketchups unless asked for.
4. Accessories: remove peelers, choppers and seeds.

Items:
{listing}
OUTPUT FORMAT:
{{"keep_indices": [0, 2, 5]}}
Return only the indices of items that match the user's intent."#
    )
}
