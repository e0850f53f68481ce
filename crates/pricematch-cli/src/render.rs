use std::fmt::Write as _;

use pricematch_core::{ParsedQuantity, ReconciliationReport, Winner};
use pricematch_engine::{classify_bucket, normalize_quantity, parse_quantity};

/// Plain-text summary of one report: a card per comparison group, then the
/// items no other retailer could be compared against.
pub(crate) fn render_report(report: &ReconciliationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", report.query);

    if !report.is_comparable() {
        let _ = writeln!(out, "not enough retailers to compare");
    }

    for group in &report.groups {
        let _ = writeln!(out, "[{}]", group.bucket);
        for (source, item) in &group.best_per_source {
            let _ = writeln!(out, "  {source:<12} {:>9.2}  {}", item.price, item.name);
        }
        match &group.winner {
            Winner::Retailer(source) => {
                let _ = writeln!(out, "  winner: {source} (save {:.2})", group.savings);
            }
            Winner::Tie => {
                let _ = writeln!(out, "  tie");
            }
        }
    }

    if !report.single_source.is_empty() {
        let _ = writeln!(out, "only at one retailer:");
        for single in &report.single_source {
            let _ = writeln!(
                out,
                "  [{}] {:<12} {:>9.2}  {} ({} item(s))",
                single.bucket, single.source, single.best.price, single.best.name, single.item_count
            );
        }
    }

    out.push('\n');
    out
}

/// Shows each stage of quantity handling for a packaging string.
pub(crate) fn render_quantity(text: &str) -> String {
    let parsed = parse_quantity(text);
    let (value, unit) = normalize_quantity(parsed);
    let parsed_label = match parsed {
        ParsedQuantity::Known { value, unit } => format!("{value} {unit}"),
        ParsedQuantity::Unknown => "unknown".to_string(),
    };
    format!(
        "parsed:     {parsed_label}\nnormalized: {value} {unit}\nbucket:     {}\n",
        classify_bucket(value, unit)
    )
}
