//! Collapsing of repeated listings within one retailer.
//!
//! Storefronts often return the same product more than once for a query
//! (sponsored slot plus organic result, or two sellers). Duplicates are keyed
//! by `(retailer, whitespace-collapsed name)`; the name comparison is
//! case-sensitive. The cheapest duplicate wins; on equal prices the first one
//! seen is kept. Survivors stay in first-seen order so downstream matching is
//! stable.

use std::collections::HashMap;

use pricematch_core::{RawListing, RetailerId};

use crate::normalize::clean_name;

/// Removes duplicate listings, keeping the lowest-priced entry per
/// `(retailer, name)`.
#[must_use]
pub fn dedupe_listings(listings: Vec<RawListing>) -> Vec<RawListing> {
    let mut slots: HashMap<(RetailerId, String), usize> = HashMap::new();
    let mut kept: Vec<RawListing> = Vec::with_capacity(listings.len());

    for listing in listings {
        let key = (listing.source.clone(), clean_name(&listing.name));
        match slots.get(&key) {
            Some(&slot) => {
                let current = &mut kept[slot];
                tracing::debug!(
                    source = %listing.source,
                    name = %key.1,
                    kept_price = current.price.min(listing.price),
                    dropped_price = current.price.max(listing.price),
                    "collapsed duplicate listing"
                );
                if listing.price < current.price {
                    *current = listing;
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push(listing);
            }
        }
    }

    kept
}
