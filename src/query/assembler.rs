use crate::index::types::{BoundingBox, ImageMatch, MatchEvidence};
use crate::query::evaluator::EvidenceMap;
use rustc_hash::FxHashSet;

/// Group evaluator output into ordered per-image results.
///
/// Evidence is deduplicated on `(term, token, box)`, keeping the first entry
/// in term/detection order. Images matching more distinct terms come first;
/// ties go to the lower image id.
pub fn assemble(evidence: EvidenceMap) -> Vec<ImageMatch> {
    let mut results: Vec<ImageMatch> = evidence
        .into_iter()
        .map(|(image_id, entries)| {
            let mut seen: FxHashSet<(String, String, BoundingBox)> = FxHashSet::default();
            let mut terms: FxHashSet<String> = FxHashSet::default();
            let mut kept: Vec<MatchEvidence> = Vec::with_capacity(entries.len());

            for entry in entries {
                if seen.insert((entry.term.clone(), entry.token.clone(), entry.bbox)) {
                    terms.insert(entry.term.clone());
                    kept.push(entry);
                }
            }

            ImageMatch {
                image_id,
                evidence: kept,
                matched_terms: terms.len(),
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.matched_terms
            .cmp(&a.matched_terms)
            .then_with(|| a.image_id.cmp(&b.image_id))
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::{ImageId, MatchKind};
    use std::collections::BTreeSet;

    fn ev(image_id: ImageId, term: &str, token_index: usize, token: &str, x: u32) -> MatchEvidence {
        MatchEvidence {
            image_id,
            term: term.to_string(),
            token_index,
            token: token.to_string(),
            kind: MatchKind::Exact,
            bbox: BoundingBox::new(x, 0, x + 5, 5),
        }
    }

    fn map(entries: Vec<MatchEvidence>) -> EvidenceMap {
        let mut out = EvidenceMap::new();
        for e in entries {
            out.entry(e.image_id).or_insert_with(BTreeSet::new).insert(e);
        }
        out
    }

    #[test]
    fn test_orders_by_term_count_then_id() {
        let results = assemble(map(vec![
            ev(3, "a", 0, "a", 0),
            ev(1, "a", 0, "a", 0),
            ev(2, "a", 0, "a", 0),
            ev(2, "b", 1, "b", 10),
        ]));

        let order: Vec<ImageId> = results.iter().map(|r| r.image_id).collect();
        assert_eq!(order, vec![2, 1, 3]);
        assert_eq!(results[0].matched_terms, 2);
        assert_eq!(results[1].matched_terms, 1);
    }

    #[test]
    fn test_dedupes_same_token_and_box() {
        // Duplicate detections of the same word in the same place
        let results = assemble(map(vec![ev(1, "task", 0, "Task", 0), ev(1, "task", 4, "Task", 0)]));
        assert_eq!(results[0].evidence.len(), 1);
        assert_eq!(results[0].evidence[0].token_index, 0);
    }

    #[test]
    fn test_keeps_same_token_in_different_boxes() {
        let results = assemble(map(vec![ev(1, "task", 0, "Task", 0), ev(1, "task", 1, "Task", 40)]));
        assert_eq!(results[0].evidence.len(), 2);
        assert_eq!(results[0].matched_terms, 1);
    }

    #[test]
    fn test_empty() {
        assert!(assemble(EvidenceMap::new()).is_empty());
    }
}
