use pricematch_core::{RetailerId, Unit};

use super::*;
use crate::bucket::classify_bucket;

fn item(source: &str, name: &str, price: f64, value: f64, unit: Unit) -> NormalizedItem {
    NormalizedItem {
        source: RetailerId::new(source),
        name: name.to_string(),
        price,
        norm_value: value,
        norm_unit: unit,
        bucket: classify_bucket(value, unit),
    }
}

fn ml(source: &str, name: &str, price: f64, value: f64) -> NormalizedItem {
    item(source, name, price, value, Unit::Millilitre)
}

fn names(outcome: &MatchOutcome) -> Vec<(&str, &str)> {
    outcome
        .pairs
        .iter()
        .map(|p| (p.item_a.name.as_str(), p.item_b.name.as_str()))
        .collect()
}

// -----------------------------------------------------------------------
// tolerance band
// -----------------------------------------------------------------------

#[test]
fn small_pack_within_sixty_is_compatible() {
    assert!(within_tolerance(200.0, 250.0));
    assert!(within_tolerance(200.0, 260.0));
}

#[test]
fn small_pack_beyond_sixty_is_incompatible() {
    assert!(!within_tolerance(200.0, 310.0));
    assert!(!within_tolerance(200.0, 260.5));
}

#[test]
fn large_pack_uses_wider_band() {
    assert!(within_tolerance(450.0, 500.0));
    assert!(within_tolerance(300.0, 450.0));
    assert!(!within_tolerance(300.0, 451.0));
}

#[test]
fn band_is_chosen_by_first_quantity() {
    // 290 is a small pack, so 290 vs 400 (diff 110) fails; 400 vs 290 passes.
    assert!(!within_tolerance(290.0, 400.0));
    assert!(within_tolerance(400.0, 290.0));
}

// -----------------------------------------------------------------------
// candidate checks
// -----------------------------------------------------------------------

#[test]
fn out_of_range_and_negative_indices_are_rejected() {
    let a = vec![ml("blinkit", "Amul Milk", 30.0, 500.0)];
    let b = vec![ml("zepto", "Nandini Milk", 28.0, 500.0)];
    let used = [false];
    for candidate in [
        SuggestedPair::new(1, 0),
        SuggestedPair::new(0, 5),
        SuggestedPair::new(-1, 0),
    ] {
        assert_eq!(
            check_candidate(&a, &b, candidate, &used, &used),
            CandidateVerdict::OutOfRange
        );
    }
}

#[test]
fn unit_mismatch_is_rejected() {
    let a = vec![ml("blinkit", "Amul Milk", 30.0, 500.0)];
    let b = vec![item("zepto", "Amul Milk Powder", 28.0, 500.0, Unit::Gram)];
    assert_eq!(
        check_candidate(&a, &b, SuggestedPair::new(0, 0), &[false], &[false]),
        CandidateVerdict::UnitMismatch
    );
}

#[test]
fn tolerance_violation_is_rejected() {
    let a = vec![ml("blinkit", "Amul Milk", 15.0, 200.0)];
    let b = vec![ml("zepto", "Amul Milk", 25.0, 310.0)];
    assert_eq!(
        check_candidate(&a, &b, SuggestedPair::new(0, 0), &[false], &[false]),
        CandidateVerdict::OutsideTolerance
    );
}

#[test]
fn used_index_is_rejected() {
    let a = vec![ml("blinkit", "Amul Milk", 30.0, 500.0)];
    let b = vec![ml("zepto", "Amul Milk", 28.0, 500.0)];
    assert_eq!(
        check_candidate(&a, &b, SuggestedPair::new(0, 0), &[true], &[false]),
        CandidateVerdict::IndexReused
    );
}

#[test]
fn short_usage_slices_count_as_unused() {
    let a = vec![ml("blinkit", "Amul Milk", 30.0, 500.0)];
    let b = vec![ml("zepto", "Amul Milk", 28.0, 500.0)];
    assert_eq!(
        check_candidate(&a, &b, SuggestedPair::new(0, 0), &[], &[]),
        CandidateVerdict::Accepted { a_idx: 0, b_idx: 0 }
    );
}

// -----------------------------------------------------------------------
// assisted pass
// -----------------------------------------------------------------------

#[test]
fn suggestions_are_accepted_in_given_order() {
    let a = vec![
        ml("blinkit", "Amul Taaza", 27.0, 500.0),
        ml("blinkit", "Amul Gold", 33.0, 500.0),
    ];
    let b = vec![
        ml("zepto", "Gold Full Cream", 34.0, 500.0),
        ml("zepto", "Taaza Toned", 26.0, 500.0),
    ];
    let outcome = match_items(
        &a,
        &b,
        &[SuggestedPair::new(1, 0), SuggestedPair::new(0, 1)],
    );
    assert_eq!(outcome.indices, vec![(1, 0), (0, 1)]);
    assert_eq!(
        names(&outcome),
        vec![("Amul Gold", "Gold Full Cream"), ("Amul Taaza", "Taaza Toned")]
    );
}

#[test]
fn suggestion_reusing_an_index_is_discarded() {
    let a = vec![
        ml("blinkit", "Amul Milk", 30.0, 500.0),
        ml("blinkit", "Heritage Milk", 29.0, 500.0),
    ];
    let b = vec![ml("zepto", "Nandini Milk", 28.0, 500.0)];
    let outcome = match_items(
        &a,
        &b,
        &[SuggestedPair::new(0, 0), SuggestedPair::new(1, 0)],
    );
    assert_eq!(outcome.indices, vec![(0, 0)]);
}

#[test]
fn accepted_pairs_share_units_and_never_reuse_indices() {
    let a = vec![
        ml("blinkit", "Amul Milk", 30.0, 500.0),
        item("blinkit", "Amul Butter", 56.0, 100.0, Unit::Gram),
        ml("blinkit", "Amul Lassi", 20.0, 200.0),
    ];
    let b = vec![
        ml("zepto", "Nandini Milk", 28.0, 450.0),
        item("zepto", "Amul Butter", 55.0, 100.0, Unit::Gram),
        ml("zepto", "Amul Lassi", 22.0, 250.0),
    ];
    let suggestions = [
        SuggestedPair::new(0, 1),
        SuggestedPair::new(0, 0),
        SuggestedPair::new(1, 1),
        SuggestedPair::new(2, 0),
        SuggestedPair::new(2, 2),
        SuggestedPair::new(9, 9),
    ];
    let outcome = match_items(&a, &b, &suggestions);

    for pair in &outcome.pairs {
        assert_eq!(pair.item_a.norm_unit, pair.item_b.norm_unit);
    }
    let mut seen_a: Vec<usize> = outcome.indices.iter().map(|(i, _)| *i).collect();
    let mut seen_b: Vec<usize> = outcome.indices.iter().map(|(_, j)| *j).collect();
    seen_a.sort_unstable();
    seen_b.sort_unstable();
    seen_a.dedup();
    seen_b.dedup();
    assert_eq!(seen_a.len(), outcome.indices.len());
    assert_eq!(seen_b.len(), outcome.indices.len());
    assert_eq!(outcome.indices, vec![(0, 0), (1, 1), (2, 2)]);
}

// -----------------------------------------------------------------------
// fallback pass
// -----------------------------------------------------------------------

#[test]
fn fallback_matches_same_bucket_similar_names() {
    let a = vec![ml("blinkit", "Amul Milk", 30.0, 500.0)];
    let b = vec![ml("zepto", "Nandini Milk", 28.0, 500.0)];
    let outcome = match_items(&a, &b, &[]);
    assert_eq!(outcome.indices, vec![(0, 0)]);
    assert_eq!(outcome.pairs[0].winner, Side::B);
}

#[test]
fn fallback_requires_same_bucket() {
    let a = vec![ml("blinkit", "Amul Milk", 30.0, 500.0)];
    let b = vec![ml("zepto", "Amul Milk", 60.0, 1000.0)];
    assert!(match_items(&a, &b, &[]).pairs.is_empty());
}

#[test]
fn fallback_rejects_similarity_of_exactly_point_three() {
    let a = vec![ml("blinkit", "abcxxxxxxx", 30.0, 500.0)];
    let b = vec![ml("zepto", "abcyyyyyyy", 28.0, 500.0)];
    assert!(match_items(&a, &b, &[]).pairs.is_empty());
}

#[test]
fn fallback_accepts_similarity_just_above_point_three() {
    let a = vec![ml("blinkit", "abcdxxxxxx", 30.0, 500.0)];
    let b = vec![ml("zepto", "abcdyyyyyy", 28.0, 500.0)];
    assert_eq!(match_items(&a, &b, &[]).pairs.len(), 1);
}

#[test]
fn fallback_is_greedy_first_fit() {
    // The first A item takes the first acceptable B item even though the
    // second B item is a closer name match.
    let a = vec![
        ml("blinkit", "Amul Taaza Milk", 27.0, 500.0),
        ml("blinkit", "Amul Gold Milk", 33.0, 500.0),
    ];
    let b = vec![
        ml("zepto", "Amul Gold Milk", 34.0, 500.0),
        ml("zepto", "Amul Taaza Milk", 26.0, 500.0),
    ];
    let outcome = match_items(&a, &b, &[]);
    assert_eq!(outcome.indices, vec![(0, 0), (1, 1)]);
}

#[test]
fn fallback_runs_after_assisted_pairs() {
    let a = vec![
        ml("blinkit", "Amul Milk", 30.0, 500.0),
        ml("blinkit", "Amul Lassi", 20.0, 200.0),
    ];
    let b = vec![
        ml("zepto", "Amul Lassi", 22.0, 250.0),
        ml("zepto", "Nandini Milk", 28.0, 500.0),
    ];
    let outcome = match_items(&a, &b, &[SuggestedPair::new(1, 0)]);
    assert_eq!(outcome.indices, vec![(1, 0), (0, 1)]);
}

// -----------------------------------------------------------------------
// winner
// -----------------------------------------------------------------------

#[test]
fn winner_compares_unit_prices_not_shelf_prices() {
    // 30 for 500 ml (0.06/ml) beats 20 for 250 ml (0.08/ml).
    let pair = price_pair(
        &ml("blinkit", "Amul Milk", 30.0, 500.0),
        &ml("zepto", "Amul Milk", 20.0, 250.0),
    );
    assert_eq!(pair.winner, Side::A);
    assert!((pair.unit_price_b - 0.08).abs() < 1e-12);
}

#[test]
fn equal_unit_prices_tie() {
    let pair = price_pair(
        &ml("blinkit", "Amul Milk", 30.0, 500.0),
        &ml("zepto", "Amul Milk", 30.0, 500.0),
    );
    assert_eq!(pair.winner, Side::Tie);
}

#[test]
fn matching_is_deterministic() {
    let a = vec![
        ml("blinkit", "Amul Milk", 30.0, 500.0),
        ml("blinkit", "Mother Dairy Milk", 29.0, 500.0),
    ];
    let b = vec![
        ml("zepto", "Nandini Milk", 28.0, 500.0),
        ml("zepto", "Mother Dairy Toned Milk", 30.0, 500.0),
    ];
    let first = match_items(&a, &b, &[]);
    let second = match_items(&a, &b, &[]);
    assert_eq!(first, second);
}
