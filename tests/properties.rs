//! Property-based tests for the matching engine
//!
//! - Substring symmetry
//! - Threshold monotonicity
//! - Boolean correctness of AND / OR
//! - Idempotent re-indexing
//! - Deterministic search ordering

mod fixtures;

use fixtures::line_of;
use ocrfind::index::{CorpusIndex, CorpusSnapshot, ImageId, ImageRecord};
use ocrfind::query::{QueryEvaluator, QueryNode, substring_match};
use ocrfind::search;
use ocrfind::utils::{edit_distance, is_fuzzy_match};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// Test Generators
// ============================================================================

fn arb_word() -> impl Strategy<Value = String> {
    "[a-e]{1,7}"
}

fn arb_corpus() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(arb_word(), 0..5), 0..8)
}

fn snapshot_of(images: &[Vec<String>]) -> CorpusSnapshot {
    CorpusSnapshot::from_records(images.iter().enumerate().map(|(i, words)| {
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        ImageRecord::new(i as ImageId + 1, line_of(&words))
    }))
}

fn matched_ids(snapshot: &CorpusSnapshot, node: &QueryNode) -> BTreeSet<ImageId> {
    QueryEvaluator::new(snapshot).evaluate(node).into_keys().collect()
}

fn term(t: &str) -> QueryNode {
    QueryNode::Term(t.to_string())
}

// ============================================================================
// Matcher properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_substring_symmetric(a in arb_word(), b in arb_word()) {
        prop_assert_eq!(substring_match(&a, &b), substring_match(&b, &a));
    }

    #[test]
    fn prop_threshold_monotonic(q in arb_word(), t in arb_word(), k in 0usize..5, extra in 1usize..4) {
        if is_fuzzy_match(&q, &t, k) {
            prop_assert!(is_fuzzy_match(&q, &t, k + extra));
        }
    }

    #[test]
    fn prop_fuzzy_agrees_with_distance(q in arb_word(), t in arb_word(), k in 0usize..5) {
        prop_assert_eq!(is_fuzzy_match(&q, &t, k), edit_distance(&q, &t) <= k);
    }
}

// ============================================================================
// Evaluator properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_and_is_intersection(corpus in arb_corpus(), l in arb_word(), r in arb_word()) {
        let snapshot = snapshot_of(&corpus);
        let left = matched_ids(&snapshot, &term(&l));
        let right = matched_ids(&snapshot, &term(&r));
        let both = matched_ids(&snapshot, &QueryNode::And(Box::new(term(&l)), Box::new(term(&r))));

        let expected: BTreeSet<_> = left.intersection(&right).copied().collect();
        prop_assert_eq!(both, expected);
    }

    #[test]
    fn prop_or_is_union(corpus in arb_corpus(), l in arb_word(), r in arb_word()) {
        let snapshot = snapshot_of(&corpus);
        let left = matched_ids(&snapshot, &term(&l));
        let right = matched_ids(&snapshot, &term(&r));
        let either = matched_ids(&snapshot, &QueryNode::Or(Box::new(term(&l)), Box::new(term(&r))));

        let expected: BTreeSet<_> = left.union(&right).copied().collect();
        prop_assert_eq!(either, expected);
    }

    #[test]
    fn prop_search_is_deterministic(corpus in arb_corpus(), words in prop::collection::vec(arb_word(), 1..4)) {
        let snapshot = snapshot_of(&corpus);
        let query = words.join(" AND ");
        prop_assert_eq!(search(&query, &snapshot), search(&query, &snapshot));
    }

    #[test]
    fn prop_add_is_idempotent(words in prop::collection::vec(arb_word(), 1..6), q in arb_word()) {
        let words: Vec<&str> = words.iter().map(String::as_str).collect();

        let once = CorpusIndex::in_memory();
        once.add_image(1, line_of(&words)).unwrap();

        let twice = CorpusIndex::in_memory();
        twice.add_image(1, line_of(&words)).unwrap();
        twice.add_image(1, line_of(&words)).unwrap();

        prop_assert_eq!(once.len(), twice.len());
        prop_assert_eq!(once.get(1), twice.get(1));
        prop_assert_eq!(search(&q, &once.snapshot()), search(&q, &twice.snapshot()));
    }
}
