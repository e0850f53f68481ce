use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Identifier of a retailer a listing was scraped from (e.g. `"blinkit"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetailerId(String);

impl RetailerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RetailerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RetailerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RetailerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single product listing as supplied by a retailer scraper.
///
/// Immutable once created; construct through [`RawListing::new`] so the
/// price invariant holds. Deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawListingRow")]
pub struct RawListing {
    pub source: RetailerId,
    pub name: String,
    /// Listed price in the retailer's currency. Always finite and `> 0`.
    pub price: f64,
    /// Free-text packaging string, e.g. `"1 pack (500 ml)"`.
    pub raw_quantity: Option<String>,
}

impl RawListing {
    /// Creates a listing, rejecting non-positive prices and blank names.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPrice`] when `price` is not finite or not
    /// strictly positive, and [`CoreError::EmptyName`] when `name` is blank.
    pub fn new(
        source: impl Into<RetailerId>,
        name: impl Into<String>,
        price: f64,
        raw_quantity: Option<String>,
    ) -> Result<Self, CoreError> {
        let source = source.into();
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::EmptyName {
                source_id: source.to_string(),
            });
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(CoreError::InvalidPrice { name, price });
        }
        Ok(Self {
            source,
            name,
            price,
            raw_quantity,
        })
    }
}

/// Unchecked wire form of [`RawListing`].
#[derive(Deserialize)]
struct RawListingRow {
    source: RetailerId,
    name: String,
    price: f64,
    #[serde(default)]
    raw_quantity: Option<String>,
}

impl TryFrom<RawListingRow> for RawListing {
    type Error = CoreError;

    fn try_from(row: RawListingRow) -> Result<Self, Self::Error> {
        RawListing::new(row.source, row.name, row.price, row.raw_quantity)
    }
}

/// Packaging units recognised by the quantity parser and the normalizer.
///
/// `Kilogram` and `Litre` only appear before normalization; every
/// [`NormalizedItem`] carries a base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "ml")]
    Millilitre,
    #[serde(rename = "l")]
    Litre,
    #[serde(rename = "pc")]
    Piece,
    #[serde(rename = "pack")]
    Pack,
    #[serde(rename = "bunch")]
    Bunch,
    #[serde(rename = "pair")]
    Pair,
    #[serde(rename = "set")]
    Set,
    #[serde(rename = "roll")]
    Roll,
    #[serde(rename = "sheet")]
    Sheet,
    #[serde(rename = "tablet")]
    Tablet,
    #[serde(rename = "sachet")]
    Sachet,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Unit {
    /// Canonical short token used in bucket keys and serialized output.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Millilitre => "ml",
            Unit::Litre => "l",
            Unit::Piece => "pc",
            Unit::Pack => "pack",
            Unit::Bunch => "bunch",
            Unit::Pair => "pair",
            Unit::Set => "set",
            Unit::Roll => "roll",
            Unit::Sheet => "sheet",
            Unit::Tablet => "tablet",
            Unit::Sachet => "sachet",
            Unit::Unknown => "unknown",
        }
    }

    /// Resolves a unit token as it appears in packaging text or storage rows.
    ///
    /// Case-insensitive. Accepts plurals (`"pcs"`, `"rolls"`) and the
    /// spellings `"gm"` and `"ltr"`. Returns `None` for anything else.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let lower = token.trim().to_lowercase();
        let singular = match lower.as_str() {
            "bunches" => "bunch",
            // Plural strip must not turn these into real units.
            "ms" | "gs" | "ls" => return None,
            s if s.len() > 1 && s.ends_with('s') => &s[..s.len() - 1],
            s => s,
        };
        let unit = match singular {
            "g" | "gm" | "gram" => Unit::Gram,
            "kg" => Unit::Kilogram,
            "ml" => Unit::Millilitre,
            "l" | "ltr" | "litre" | "liter" => Unit::Litre,
            "pc" | "piece" => Unit::Piece,
            "pack" => Unit::Pack,
            "bunch" => Unit::Bunch,
            "pair" => Unit::Pair,
            "set" => Unit::Set,
            "roll" => Unit::Roll,
            "sheet" => Unit::Sheet,
            "tablet" => Unit::Tablet,
            "sachet" => Unit::Sachet,
            "unknown" => Unit::Unknown,
            _ => return None,
        };
        Some(unit)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Result of parsing a free-text packaging string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ParsedQuantity {
    Known { value: f64, unit: Unit },
    /// No recognised pattern; the item falls into the `"unknown"` bucket.
    Unknown,
}

impl ParsedQuantity {
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, ParsedQuantity::Known { .. })
    }
}

/// A deduplicated listing with its quantity expressed in a base unit and
/// assigned to a comparison bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub source: RetailerId,
    /// Whitespace-collapsed product name.
    pub name: String,
    pub price: f64,
    /// Quantity in `norm_unit`; `0.0` when the quantity is unknown.
    pub norm_value: f64,
    pub norm_unit: Unit,
    /// Coarse pack-size class, e.g. `"500ml"` or `"10-12pcs"`.
    pub bucket: String,
}

impl NormalizedItem {
    /// Price per base unit. Quantities below one count as one so unknown
    /// or fractional packs never divide by zero.
    #[must_use]
    pub fn unit_price(&self) -> f64 {
        self.price / self.norm_value.max(1.0)
    }

    /// Quantity rendered as `"<integer><unit>"`, e.g. `"450ml"`.
    #[must_use]
    pub fn quantity_label(&self) -> String {
        #[allow(clippy::cast_possible_truncation)]
        let whole = self.norm_value.trunc() as i64;
        format!("{whole}{}", self.norm_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(price: f64, norm_value: f64, norm_unit: Unit) -> NormalizedItem {
        NormalizedItem {
            source: RetailerId::new("zepto"),
            name: "Amul Taaza Toned Milk".to_string(),
            price,
            norm_value,
            norm_unit,
            bucket: "500ml".to_string(),
        }
    }

    #[test]
    fn raw_listing_rejects_zero_price() {
        let err = RawListing::new("blinkit", "Amul Milk", 0.0, None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPrice { .. }));
    }

    #[test]
    fn raw_listing_rejects_nan_price() {
        let err = RawListing::new("blinkit", "Amul Milk", f64::NAN, None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPrice { .. }));
    }

    #[test]
    fn raw_listing_rejects_blank_name() {
        let err = RawListing::new("blinkit", "   ", 30.0, None).unwrap_err();
        assert!(matches!(err, CoreError::EmptyName { ref source_id } if source_id == "blinkit"));
    }

    #[test]
    fn raw_listing_accepts_valid_row() {
        let listing =
            RawListing::new("blinkit", "Amul Milk", 30.0, Some("500 ml".to_string())).unwrap();
        assert_eq!(listing.source.as_str(), "blinkit");
        assert_eq!(listing.raw_quantity.as_deref(), Some("500 ml"));
    }

    #[test]
    fn raw_listing_deserialization_rejects_invalid_rows() {
        let err = serde_json::from_str::<RawListing>(
            r#"{"source":"blinkit","name":"","price":-5.0,"raw_quantity":null}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("empty product name"));

        let err = serde_json::from_str::<RawListing>(
            r#"{"source":"blinkit","name":"Amul Milk","price":-5.0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid price"));
    }

    #[test]
    fn raw_listing_deserializes_valid_row() {
        let listing: RawListing = serde_json::from_str(
            r#"{"source":"zepto","name":"Nandini Milk","price":28.0,"raw_quantity":"500 ml"}"#,
        )
        .unwrap();
        assert_eq!(listing.source.as_str(), "zepto");
        assert_eq!(listing.raw_quantity.as_deref(), Some("500 ml"));
    }

    #[test]
    fn unit_from_token_handles_plurals_and_aliases() {
        assert_eq!(Unit::from_token("pcs"), Some(Unit::Piece));
        assert_eq!(Unit::from_token("Rolls"), Some(Unit::Roll));
        assert_eq!(Unit::from_token("gm"), Some(Unit::Gram));
        assert_eq!(Unit::from_token("ltr"), Some(Unit::Litre));
        assert_eq!(Unit::from_token("sachets"), Some(Unit::Sachet));
        assert_eq!(Unit::from_token("KG"), Some(Unit::Kilogram));
    }

    #[test]
    fn unit_from_token_rejects_unrecognised() {
        assert_eq!(Unit::from_token("oz"), None);
        assert_eq!(Unit::from_token(""), None);
        assert_eq!(Unit::from_token("ms"), None);
    }

    #[test]
    fn unit_serializes_as_token() {
        assert_eq!(serde_json::to_string(&Unit::Millilitre).unwrap(), "\"ml\"");
        assert_eq!(serde_json::to_string(&Unit::Piece).unwrap(), "\"pc\"");
    }

    #[test]
    fn unit_price_uses_quantity() {
        let item = make_item(30.0, 500.0, Unit::Millilitre);
        assert!((item.unit_price() - 0.06).abs() < 1e-12);
    }

    #[test]
    fn unit_price_floors_quantity_at_one() {
        let item = make_item(30.0, 0.0, Unit::Unknown);
        assert!((item.unit_price() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quantity_label_truncates_fraction() {
        let item = make_item(30.0, 450.7, Unit::Millilitre);
        assert_eq!(item.quantity_label(), "450ml");
    }
}
