//! Output types of a reconciliation run.
//!
//! [`ReconciliationGroup`] serializes to the stable shape consumed by the
//! storage and presentation collaborators:
//!
//! ```json
//! { "bucket": "500ml",
//!   "best": { "blinkit": { "name": "Amul Milk", "price": 30.0 },
//!             "zepto":   { "name": "Nandini Milk", "price": 28.0 } },
//!   "winner": "zepto", "savings": 2.0 }
//! ```

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::listings::{NormalizedItem, RetailerId};

/// Which side of a [`MatchPair`] has the lower unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    A,
    B,
    Tie,
}

/// Two listings from different retailers judged to be the same pack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPair {
    pub item_a: NormalizedItem,
    pub item_b: NormalizedItem,
    pub unit_price_a: f64,
    pub unit_price_b: f64,
    pub winner: Side,
}

/// Overall winner of a [`ReconciliationGroup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winner {
    Retailer(RetailerId),
    Tie,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Retailer(id) => write!(f, "{id}"),
            Winner::Tie => write!(f, "Tie"),
        }
    }
}

impl Serialize for Winner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Cheapest item per retailer within one bucket, with the winning retailer.
///
/// Only built for buckets holding items from at least two retailers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationGroup {
    pub bucket: String,
    pub best_per_source: BTreeMap<RetailerId, NormalizedItem>,
    pub winner: Winner,
    /// Next-cheapest retailer's price minus the winner's; `0.0` on a tie.
    pub savings: f64,
}

#[derive(Serialize)]
struct BestOffer<'a> {
    name: &'a str,
    price: f64,
}

impl Serialize for ReconciliationGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let best: BTreeMap<&str, BestOffer<'_>> = self
            .best_per_source
            .iter()
            .map(|(source, item)| {
                (
                    source.as_str(),
                    BestOffer {
                        name: &item.name,
                        price: item.price,
                    },
                )
            })
            .collect();

        let mut state = serializer.serialize_struct("ReconciliationGroup", 4)?;
        state.serialize_field("bucket", &self.bucket)?;
        state.serialize_field("best", &best)?;
        state.serialize_field("winner", &self.winner)?;
        state.serialize_field("savings", &self.savings)?;
        state.end()
    }
}

/// Items that took part in no comparison group, summarised per bucket and
/// retailer so callers can still show them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleSourceGroup {
    pub bucket: String,
    pub source: RetailerId,
    /// Cheapest of the `item_count` leftover items.
    pub best: NormalizedItem,
    pub item_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStatus {
    Success,
    /// Fewer than two retailers had items left to compare.
    InsufficientData,
}

/// Complete result of reconciling one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    pub query: String,
    pub status: ReconcileStatus,
    pub pairs: Vec<MatchPair>,
    /// Sorted by bucket key, ascending.
    pub groups: Vec<ReconciliationGroup>,
    pub single_source: Vec<SingleSourceGroup>,
    pub unmatched: Vec<NormalizedItem>,
}

impl ReconciliationReport {
    /// Report for a query where no comparison was possible. Every item that
    /// did survive is still exposed through `unmatched`.
    #[must_use]
    pub fn insufficient(
        query: &str,
        unmatched: Vec<NormalizedItem>,
        single_source: Vec<SingleSourceGroup>,
    ) -> Self {
        Self {
            query: query.to_string(),
            status: ReconcileStatus::InsufficientData,
            pairs: Vec::new(),
            groups: Vec::new(),
            single_source,
            unmatched,
        }
    }

    #[must_use]
    pub fn is_comparable(&self) -> bool {
        self.status == ReconcileStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::Unit;

    fn make_item(source: &str, name: &str, price: f64) -> NormalizedItem {
        NormalizedItem {
            source: RetailerId::new(source),
            name: name.to_string(),
            price,
            norm_value: 500.0,
            norm_unit: Unit::Millilitre,
            bucket: "500ml".to_string(),
        }
    }

    #[test]
    fn group_serializes_to_wire_shape() {
        let mut best = BTreeMap::new();
        best.insert(
            RetailerId::new("blinkit"),
            make_item("blinkit", "Amul Milk", 30.0),
        );
        best.insert(
            RetailerId::new("zepto"),
            make_item("zepto", "Nandini Milk", 28.0),
        );
        let group = ReconciliationGroup {
            bucket: "500ml".to_string(),
            best_per_source: best,
            winner: Winner::Retailer(RetailerId::new("zepto")),
            savings: 2.0,
        };

        let value = serde_json::to_value(&group).expect("serialization failed");
        assert_eq!(
            value,
            serde_json::json!({
                "bucket": "500ml",
                "best": {
                    "blinkit": { "name": "Amul Milk", "price": 30.0 },
                    "zepto": { "name": "Nandini Milk", "price": 28.0 }
                },
                "winner": "zepto",
                "savings": 2.0
            })
        );
    }

    #[test]
    fn tie_winner_serializes_as_tie() {
        assert_eq!(serde_json::to_string(&Winner::Tie).unwrap(), "\"Tie\"");
    }

    #[test]
    fn insufficient_report_keeps_items() {
        let item = make_item("blinkit", "Amul Milk", 30.0);
        let report = ReconciliationReport::insufficient("milk", vec![item.clone()], Vec::new());
        assert!(!report.is_comparable());
        assert_eq!(report.unmatched, vec![item]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "insufficient_data");
    }
}
