//! Extraction of a pack quantity from free-text packaging strings.
//!
//! Retailers describe packs inconsistently (`"1 pack (500 ml)"`, `"500 gm"`,
//! `"1 dozen"`, `"Pack of 6"`). [`parse_quantity`] tries a fixed list of
//! patterns in priority order and returns the first hit; see
//! [`crate::normalize`] for the conversion into base units.

use std::sync::LazyLock;

use pricematch_core::{ParsedQuantity, Unit};
use regex::{Captures, Regex};

/// Unit alternation shared by the parenthesized and bare patterns. Longer
/// spellings come first so `"gm"` is not read as `"g"`.
const UNIT_ALTERNATION: &str =
    "pairs|pair|sets|set|rolls|roll|sheets|sheet|tablets|tablet|sachets|sachet|pcs|pc|ml|kg|gm|g|l";

static DOZEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*dozen").expect("valid dozen regex"));

static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\(\s*(\d+(?:\.\d+)?)\s*({UNIT_ALTERNATION})\s*\)"
    ))
    .expect("valid parenthesized quantity regex")
});

static BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(\d+(?:\.\d+)?)\s*({UNIT_ALTERNATION})"))
        .expect("valid bare quantity regex")
});

static PACK_OF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pack of\s*(\d+)").expect("valid pack-of regex"));

static N_PACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*pack").expect("valid n-pack regex"));

/// Parses a packaging string into a value and unit.
///
/// Rules, first match wins (case-insensitive):
/// 1. `"dozen"` → leading number (default 1) × 12 pieces.
/// 2. `"bunch"` / `"bundle"` → 1 bunch.
/// 3. `"(<n> <unit>)"`, the most reliable form.
/// 4. `"<n> <unit>"` anywhere in the string.
/// 5. `"pack of <n>"` → n pieces.
/// 6. `"<n> pack"` → n packs.
///
/// Plural units are singularized and `"gm"` becomes `"g"`. Anything else,
/// including an empty string, is [`ParsedQuantity::Unknown`].
#[must_use]
pub fn parse_quantity(text: &str) -> ParsedQuantity {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return ParsedQuantity::Unknown;
    }

    parse_dozen(&lower)
        .or_else(|| parse_bunch(&lower))
        .or_else(|| captures_to_quantity(PARENTHESIZED.captures(&lower)))
        .or_else(|| captures_to_quantity(BARE.captures(&lower)))
        .or_else(|| parse_count(&PACK_OF, &lower, Unit::Piece))
        .or_else(|| parse_count(&N_PACK, &lower, Unit::Pack))
        .unwrap_or(ParsedQuantity::Unknown)
}

fn parse_dozen(lower: &str) -> Option<ParsedQuantity> {
    if !lower.contains("dozen") {
        return None;
    }
    let dozens = DOZEN
        .captures(lower)
        .and_then(|c| c[1].parse::<f64>().ok())
        .unwrap_or(1.0);
    Some(ParsedQuantity::Known {
        value: dozens * 12.0,
        unit: Unit::Piece,
    })
}

fn parse_bunch(lower: &str) -> Option<ParsedQuantity> {
    (lower.contains("bunch") || lower.contains("bundle")).then_some(ParsedQuantity::Known {
        value: 1.0,
        unit: Unit::Bunch,
    })
}

/// Converts a `(number, unit)` capture into a quantity. The unit token is
/// always one of [`UNIT_ALTERNATION`], so `from_token` resolves it.
fn captures_to_quantity(captures: Option<Captures<'_>>) -> Option<ParsedQuantity> {
    let captures = captures?;
    let value = captures[1].parse::<f64>().ok()?;
    let unit = Unit::from_token(&captures[2])?;
    Some(ParsedQuantity::Known { value, unit })
}

fn parse_count(pattern: &Regex, lower: &str, unit: Unit) -> Option<ParsedQuantity> {
    let value = pattern.captures(lower)?[1].parse::<f64>().ok()?;
    Some(ParsedQuantity::Known { value, unit })
}

#[cfg(test)]
#[path = "quantity_test.rs"]
mod tests;
