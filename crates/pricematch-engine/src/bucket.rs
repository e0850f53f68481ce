//! Coarse pack-size classes that make cross-retailer comparison meaningful.
//!
//! Retailers round pack sizes differently (450 ml vs 500 ml, 10 vs 12 eggs),
//! so exact quantities rarely line up. The bands below group sizes that
//! shoppers treat as interchangeable. Sizes outside every band keep their
//! rendered quantity as the bucket key, so every item always has a bucket.

use pricematch_core::Unit;

/// Renders a normalized quantity as `"<integer><unit>"`, e.g. `"500ml"`.
#[must_use]
pub fn render_quantity(value: f64, unit: Unit) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let whole = value.trunc() as i64;
    format!("{whole}{unit}")
}

/// Maps a normalized `(value, unit)` to its comparison bucket.
///
/// | unit | values        | bucket        |
/// |------|---------------|---------------|
/// | ml   | 180, 200, 250 | `"200-250ml"` |
/// | ml   | 450, 475, 500 | `"500ml"`     |
/// | ml   | 900, 1000     | `"1000ml"`    |
/// | g    | 280           | `"280g"`      |
/// | g    | 560           | `"560g"`      |
/// | pc   | 6             | `"6pcs"`      |
/// | pc   | 10, 12        | `"10-12pcs"`  |
/// | pc   | 30            | `"30pcs"`     |
///
/// Bands match the integer part exactly. Everything else, including pass-through
/// units such as pair, set, roll and bunch, returns [`render_quantity`] verbatim.
/// Unknown quantities all share the `"unknown"` bucket.
#[must_use]
pub fn classify_bucket(value: f64, unit: Unit) -> String {
    if unit == Unit::Unknown {
        return Unit::Unknown.to_string();
    }

    #[allow(clippy::cast_possible_truncation)]
    let whole = value.trunc() as i64;
    let band = match (unit, whole) {
        (Unit::Millilitre, 180 | 200 | 250) => Some("200-250ml"),
        (Unit::Millilitre, 450 | 475 | 500) => Some("500ml"),
        (Unit::Millilitre, 900 | 1000) => Some("1000ml"),
        (Unit::Gram, 280) => Some("280g"),
        (Unit::Gram, 560) => Some("560g"),
        (Unit::Piece, 6) => Some("6pcs"),
        (Unit::Piece, 10 | 12) => Some("10-12pcs"),
        (Unit::Piece, 30) => Some("30pcs"),
        _ => None,
    };

    band.map_or_else(|| render_quantity(value, unit), str::to_string)
}
