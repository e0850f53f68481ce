use std::path::{Path, PathBuf};

use anyhow::Context;
use futures::stream::{self, StreamExt};
use pricematch_core::{
    load_synonyms, AppConfig, GroupingMode, IntentFilter, MatchSuggester, RawListing,
    ReconciliationReport, SynonymDictionary, Unassisted,
};
use pricematch_engine::{autocorrect_query, keyword_filter, EngineConfig, Reconciler};
use pricematch_llm::LlmClient;
use serde::Deserialize;

use crate::render::render_report;
use crate::OutputFormat;

#[derive(Debug)]
pub(crate) struct CompareArgs {
    pub input: PathBuf,
    pub format: OutputFormat,
    pub no_assist: bool,
    pub grouping: Option<GroupingMode>,
    pub queries: Vec<String>,
}

/// One stored listing as exported by the storage side.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListingRow {
    pub source: String,
    pub query: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub raw_quantity: Option<String>,
}

pub(crate) async fn run_compare(config: &AppConfig, args: &CompareArgs) -> anyhow::Result<()> {
    let dictionary = match &config.synonyms_path {
        Some(path) => load_synonyms(path)
            .with_context(|| format!("failed to load synonyms from {}", path.display()))?,
        None => SynonymDictionary::builtin(),
    };
    let rows = load_rows(&args.input)?;

    let mut engine_config = EngineConfig::from_app_config(config);
    if let Some(grouping) = args.grouping {
        engine_config.grouping = grouping;
    }

    let client = if args.no_assist {
        None
    } else {
        LlmClient::from_app_config(config).context("failed to build LLM client")?
    };
    if client.is_none() {
        tracing::info!("assisted matching disabled; using deterministic fallback only");
    }

    let max_concurrent = config.max_concurrent_queries.max(1);
    let reports = match &client {
        Some(client) => {
            let reconciler = Reconciler::new(engine_config, client, client);
            reconcile_all(&reconciler, &rows, &args.queries, &dictionary, max_concurrent).await
        }
        None => {
            let reconciler = Reconciler::new(engine_config, &Unassisted, &Unassisted);
            reconcile_all(&reconciler, &rows, &args.queries, &dictionary, max_concurrent).await
        }
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Table => {
            for report in &reports {
                print!("{}", render_report(report));
            }
        }
    }

    Ok(())
}

pub(crate) fn load_rows(path: &Path) -> anyhow::Result<Vec<ListingRow>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read listings from {}", path.display()))?;
    let rows: Vec<ListingRow> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse listings in {}", path.display()))?;
    tracing::debug!(rows = rows.len(), path = %path.display(), "loaded listings");
    Ok(rows)
}

/// Rows stored under `query` (case-insensitive), turned into validated
/// listings. Rows with a bad price or blank name are skipped.
pub(crate) fn listings_for(rows: &[ListingRow], query: &str) -> Vec<RawListing> {
    rows.iter()
        .filter(|row| row.query.trim().eq_ignore_ascii_case(query))
        .filter_map(|row| {
            RawListing::new(
                row.source.as_str(),
                row.name.as_str(),
                row.price,
                row.raw_quantity.clone(),
            )
            .map_err(|e| tracing::warn!(error = %e, "skipping invalid listing row"))
            .ok()
        })
        .collect()
}

/// Reconciles every query, at most `max_concurrent` at a time. Reports come
/// back in the order the queries were given.
pub(crate) async fn reconcile_all<S, F>(
    reconciler: &Reconciler<'_, S, F>,
    rows: &[ListingRow],
    queries: &[String],
    dictionary: &SynonymDictionary,
    max_concurrent: usize,
) -> Vec<ReconciliationReport>
where
    S: MatchSuggester,
    F: IntentFilter,
{
    let mut reports: Vec<(usize, ReconciliationReport)> = stream::iter(queries.iter().enumerate())
        .map(|(position, raw_query)| async move {
            let query = autocorrect_query(raw_query, dictionary);
            let mut listings = listings_for(rows, &query);
            if listings.is_empty() {
                listings = listings_for(rows, raw_query.trim());
            }
            let listings = keyword_filter(listings, &query, dictionary);
            (position, reconciler.reconcile(&query, listings).await)
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    reports.sort_by_key(|(position, _)| *position);
    reports.into_iter().map(|(_, report)| report).collect()
}
