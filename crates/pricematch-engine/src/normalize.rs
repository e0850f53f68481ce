use pricematch_core::{NormalizedItem, ParsedQuantity, RawListing, Unit};

use crate::bucket::classify_bucket;
use crate::quantity::parse_quantity;

/// Converts a parsed quantity into its base unit.
///
/// Litres become millilitres and kilograms become grams (×1000); every other
/// unit passes through. An unknown quantity becomes `(0.0, Unit::Unknown)`.
#[must_use]
pub fn normalize_quantity(parsed: ParsedQuantity) -> (f64, Unit) {
    match parsed {
        ParsedQuantity::Known {
            value,
            unit: Unit::Litre,
        } => (value * 1000.0, Unit::Millilitre),
        ParsedQuantity::Known {
            value,
            unit: Unit::Kilogram,
        } => (value * 1000.0, Unit::Gram),
        ParsedQuantity::Known { value, unit } => (value, unit),
        ParsedQuantity::Unknown => (0.0, Unit::Unknown),
    }
}

/// Trims and collapses internal runs of whitespace to a single space.
#[must_use]
pub fn clean_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses, normalizes and buckets a single listing. A missing packaging
/// string is treated like an unparseable one.
#[must_use]
pub fn normalize_listing(listing: &RawListing) -> NormalizedItem {
    let parsed = listing
        .raw_quantity
        .as_deref()
        .map_or(ParsedQuantity::Unknown, parse_quantity);
    let (norm_value, norm_unit) = normalize_quantity(parsed);

    NormalizedItem {
        source: listing.source.clone(),
        name: clean_name(&listing.name),
        price: listing.price,
        norm_value,
        norm_unit,
        bucket: classify_bucket(norm_value, norm_unit),
    }
}
