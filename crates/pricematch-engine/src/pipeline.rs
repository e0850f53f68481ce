//! End-to-end reconciliation of one query's listings.
//!
//! dedup → parse/normalize/bucket → intent filter → per-retailer-pair
//! matching → grouping. Only the two capability calls suspend; both run
//! under [`EngineConfig::capability_timeout`] and fall back on failure.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use pricematch_core::{
    AppConfig, CapabilityError, GroupingMode, IntentFilter, MatchSuggester, NormalizedItem,
    RawListing, ReconcileStatus, ReconciliationReport, RetailerId, SuggestedPair,
};

use crate::dedup::dedupe_listings;
use crate::matcher::match_items;
use crate::normalize::normalize_listing;
use crate::report::{groups_from_items, groups_from_pairs, single_source_groups};

const DEFAULT_CAPABILITY_TIMEOUT: Duration = Duration::from_secs(20);

/// Engine settings, fixed for the lifetime of a [`Reconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Deadline for each suggester or intent-filter call.
    pub capability_timeout: Duration,
    pub grouping: GroupingMode,
}

impl EngineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            capability_timeout: Duration::from_secs(config.llm_timeout_secs),
            grouping: config.grouping,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capability_timeout: DEFAULT_CAPABILITY_TIMEOUT,
            grouping: GroupingMode::default(),
        }
    }
}

/// Runs reconciliations against borrowed capabilities.
///
/// Holds no mutable state, so one instance can serve concurrent queries.
pub struct Reconciler<'a, S, F> {
    config: EngineConfig,
    suggester: &'a S,
    filter: &'a F,
}

impl<'a, S, F> Reconciler<'a, S, F>
where
    S: MatchSuggester,
    F: IntentFilter,
{
    #[must_use]
    pub fn new(config: EngineConfig, suggester: &'a S, filter: &'a F) -> Self {
        Self {
            config,
            suggester,
            filter,
        }
    }

    /// Reconciles one query's listings from any number of retailers.
    ///
    /// Never fails: capability errors fall back to deterministic behaviour
    /// and too little data is reported as
    /// [`ReconcileStatus::InsufficientData`].
    pub async fn reconcile(&self, query: &str, listings: Vec<RawListing>) -> ReconciliationReport {
        let received = listings.len();
        let listings = dedupe_listings(listings);
        let deduped = listings.len();

        let items: Vec<NormalizedItem> = listings.iter().map(normalize_listing).collect();
        let items = self.apply_intent_filter(query, items).await;
        let by_source = split_by_source(items);

        if by_source.len() < 2 {
            let items: Vec<NormalizedItem> =
                by_source.into_iter().flat_map(|(_, items)| items).collect();
            tracing::info!(
                query,
                received,
                deduped,
                kept = items.len(),
                "not enough retailers to compare"
            );
            let single_source = single_source_groups(&items, &items);
            return ReconciliationReport::insufficient(query, items, single_source);
        }

        let mut pairs = Vec::new();
        let mut matched: Vec<Vec<bool>> = by_source
            .iter()
            .map(|(_, items)| vec![false; items.len()])
            .collect();

        for i in 0..by_source.len() {
            for j in (i + 1)..by_source.len() {
                let (source_a, list_a) = &by_source[i];
                let (source_b, list_b) = &by_source[j];
                let suggestions = self.suggest(source_a, list_a, source_b, list_b).await;
                let outcome = match_items(list_a, list_b, &suggestions);
                for &(a_idx, b_idx) in &outcome.indices {
                    matched[i][a_idx] = true;
                    matched[j][b_idx] = true;
                }
                pairs.extend(outcome.pairs);
            }
        }

        let all_items: Vec<NormalizedItem> = by_source
            .iter()
            .flat_map(|(_, items)| items.iter().cloned())
            .collect();
        let unmatched: Vec<NormalizedItem> = by_source
            .into_iter()
            .zip(matched)
            .flat_map(|((_, items), flags)| {
                items
                    .into_iter()
                    .zip(flags)
                    .filter_map(|(item, used)| (!used).then_some(item))
            })
            .collect();

        let (groups, single_source) = match self.config.grouping {
            GroupingMode::Pairs => (
                groups_from_pairs(&pairs),
                single_source_groups(&unmatched, &all_items),
            ),
            GroupingMode::Buckets => groups_from_items(&all_items),
        };

        tracing::info!(
            query,
            received,
            deduped,
            pairs = pairs.len(),
            groups = groups.len(),
            unmatched = unmatched.len(),
            grouping = %self.config.grouping,
            "reconciliation complete"
        );

        ReconciliationReport {
            query: query.to_string(),
            status: ReconcileStatus::Success,
            pairs,
            groups,
            single_source,
            unmatched,
        }
    }

    async fn apply_intent_filter(
        &self,
        query: &str,
        items: Vec<NormalizedItem>,
    ) -> Vec<NormalizedItem> {
        if items.is_empty() {
            return items;
        }

        let answer =
            with_deadline(self.config.capability_timeout, self.filter.keep(query, &items)).await;
        match answer {
            Ok(indices) => {
                let keep: HashSet<usize> = indices.into_iter().collect();
                let before = items.len();
                let kept: Vec<NormalizedItem> = items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(idx, item)| keep.contains(&idx).then_some(item))
                    .collect();
                tracing::debug!(
                    query,
                    removed = before - kept.len(),
                    kept = kept.len(),
                    "intent filter applied"
                );
                kept
            }
            Err(err) => {
                log_fallback("intent filter", &err);
                items
            }
        }
    }

    async fn suggest(
        &self,
        source_a: &RetailerId,
        list_a: &[NormalizedItem],
        source_b: &RetailerId,
        list_b: &[NormalizedItem],
    ) -> Vec<SuggestedPair> {
        let answer = with_deadline(
            self.config.capability_timeout,
            self.suggester.suggest(list_a, list_b),
        )
        .await;
        match answer {
            Ok(suggestions) => {
                tracing::debug!(
                    %source_a,
                    %source_b,
                    suggested = suggestions.len(),
                    "received match suggestions"
                );
                suggestions
            }
            Err(err) => {
                log_fallback("match suggester", &err);
                Vec::new()
            }
        }
    }
}

/// Groups items by retailer, retailers in order of first appearance and
/// items in input order.
fn split_by_source(items: Vec<NormalizedItem>) -> Vec<(RetailerId, Vec<NormalizedItem>)> {
    let mut by_source: Vec<(RetailerId, Vec<NormalizedItem>)> = Vec::new();
    for item in items {
        match by_source.iter_mut().find(|(source, _)| *source == item.source) {
            Some((_, list)) => list.push(item),
            None => by_source.push((item.source.clone(), vec![item])),
        }
    }
    by_source
}

async fn with_deadline<T>(
    deadline: Duration,
    call: impl Future<Output = Result<T, CapabilityError>>,
) -> Result<T, CapabilityError> {
    tokio::time::timeout(deadline, call)
        .await
        .unwrap_or(Err(CapabilityError::Timeout(deadline)))
}

fn log_fallback(capability: &str, err: &CapabilityError) {
    if matches!(err, CapabilityError::Disabled) {
        tracing::debug!(capability, "capability disabled; using deterministic fallback");
    } else {
        tracing::warn!(capability, error = %err, "capability failed; using deterministic fallback");
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
