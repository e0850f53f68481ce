//! Per-bucket winner and savings computation.

use std::collections::{BTreeMap, BTreeSet};

use pricematch_core::{
    MatchPair, NormalizedItem, ReconciliationGroup, RetailerId, SingleSourceGroup, Winner,
};

/// Cheapest item and item count per retailer, per bucket.
type BucketTable = BTreeMap<String, BTreeMap<RetailerId, (NormalizedItem, usize)>>;

/// Rounds a currency amount to two decimals.
#[must_use]
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Picks the winning retailer among per-retailer best items.
///
/// The retailer with the strictly lowest price wins and saves the shopper
/// the gap to the next-cheapest retailer. Several retailers sharing the
/// lowest price is a [`Winner::Tie`] with zero savings.
#[must_use]
pub fn decide_winner(best_per_source: &BTreeMap<RetailerId, NormalizedItem>) -> (Winner, f64) {
    let mut ranked: Vec<(&RetailerId, f64)> = best_per_source
        .iter()
        .map(|(source, item)| (source, item.price))
        .collect();
    ranked.sort_by(|x, y| x.1.total_cmp(&y.1));

    match ranked.as_slice() {
        [(winner, cheapest), (_, runner_up), ..] if cheapest < runner_up => (
            Winner::Retailer((*winner).clone()),
            round_currency(runner_up - cheapest),
        ),
        _ => (Winner::Tie, 0.0),
    }
}

/// Builds comparison groups from accepted pairs. Each pair is filed under
/// its first item's bucket; both items compete for the cheapest slot of
/// their retailer.
#[must_use]
pub fn groups_from_pairs(pairs: &[MatchPair]) -> Vec<ReconciliationGroup> {
    let mut table = BucketTable::new();
    for pair in pairs {
        let bucket = &pair.item_a.bucket;
        record(&mut table, bucket, &pair.item_a);
        record(&mut table, bucket, &pair.item_b);
    }
    split_table(table).0
}

/// Builds comparison groups straight from every item's own bucket, plus
/// the single-retailer leftovers.
#[must_use]
pub fn groups_from_items(
    items: &[NormalizedItem],
) -> (Vec<ReconciliationGroup>, Vec<SingleSourceGroup>) {
    let mut table = BucketTable::new();
    for item in items {
        record(&mut table, &item.bucket, item);
    }
    split_table(table)
}

/// Summarises leftover items whose bucket holds only one retailer across
/// `all_items`, cheapest per `(bucket, retailer)`. Leftovers in a bucket
/// that other retailers also stock are left out.
#[must_use]
pub fn single_source_groups(
    leftover: &[NormalizedItem],
    all_items: &[NormalizedItem],
) -> Vec<SingleSourceGroup> {
    let mut retailers: BTreeMap<&str, BTreeSet<&RetailerId>> = BTreeMap::new();
    for item in all_items {
        retailers.entry(item.bucket.as_str()).or_default().insert(&item.source);
    }

    let mut table = BucketTable::new();
    for item in leftover {
        if retailers.get(item.bucket.as_str()).is_none_or(|sources| sources.len() < 2) {
            record(&mut table, &item.bucket, item);
        }
    }
    split_table(table).1
}

fn leftovers(
    bucket: &str,
    per_source: BTreeMap<RetailerId, (NormalizedItem, usize)>,
) -> Vec<SingleSourceGroup> {
    per_source
        .into_iter()
        .map(|(source, (best, item_count))| SingleSourceGroup {
            bucket: bucket.to_string(),
            source,
            best,
            item_count,
        })
        .collect()
}

fn record(table: &mut BucketTable, bucket: &str, item: &NormalizedItem) {
    let per_source = table.entry(bucket.to_string()).or_default();
    per_source
        .entry(item.source.clone())
        .and_modify(|(best, count)| {
            *count += 1;
            if item.price < best.price {
                *best = item.clone();
            }
        })
        .or_insert_with(|| (item.clone(), 1));
}

/// Buckets with two or more retailers become groups; the rest are
/// single-source. Both come out sorted by bucket key.
fn split_table(table: BucketTable) -> (Vec<ReconciliationGroup>, Vec<SingleSourceGroup>) {
    let mut groups = Vec::new();
    let mut single_source = Vec::new();

    for (bucket, per_source) in table {
        if per_source.len() < 2 {
            single_source.extend(leftovers(&bucket, per_source));
            continue;
        }

        let best_per_source: BTreeMap<RetailerId, NormalizedItem> = per_source
            .into_iter()
            .map(|(source, (best, _))| (source, best))
            .collect();
        let (winner, savings) = decide_winner(&best_per_source);
        groups.push(ReconciliationGroup {
            bucket,
            best_per_source,
            winner,
            savings,
        });
    }

    (groups, single_source)
}
