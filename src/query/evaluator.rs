use crate::index::corpus::CorpusSnapshot;
use crate::index::types::{ImageId, ImageRecord, MatchEvidence};
use crate::query::SearchOptions;
use crate::query::matcher::match_token;
use crate::query::parser::QueryNode;
use crate::utils::normalize_text;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};

/// Matching images and the evidence for each
pub type EvidenceMap = BTreeMap<ImageId, BTreeSet<MatchEvidence>>;

/// Evaluates query trees against one corpus snapshot
pub struct QueryEvaluator<'a> {
    snapshot: &'a CorpusSnapshot,
    parallel: bool,
    parallel_min_images: usize,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(snapshot: &'a CorpusSnapshot) -> Self {
        Self::with_options(snapshot, &SearchOptions::default())
    }

    pub fn with_options(snapshot: &'a CorpusSnapshot, options: &SearchOptions) -> Self {
        Self {
            snapshot,
            parallel: options.parallel,
            parallel_min_images: options.parallel_min_images,
        }
    }

    /// Evaluate `node`, scanning the snapshot once per distinct term
    pub fn evaluate(&self, node: &QueryNode) -> EvidenceMap {
        let terms = node.terms();
        if terms.is_empty() || self.snapshot.is_empty() {
            return EvidenceMap::new();
        }

        let images: Vec<&ImageRecord> = self.snapshot.all_images().collect();
        let hits: FxHashMap<&str, EvidenceMap> = terms
            .iter()
            .map(|&term| (term, self.match_term(term, &images)))
            .collect();

        let result = Self::combine(node, &hits);
        tracing::debug!(
            query = %node,
            terms = terms.len(),
            images = images.len(),
            matched = result.len(),
            "query evaluated"
        );
        result
    }

    /// Images with at least one token satisfying `term`
    fn match_term(&self, term: &str, images: &[&ImageRecord]) -> EvidenceMap {
        let term = normalize_text(term);
        if term.is_empty() {
            return EvidenceMap::new();
        }

        if self.parallel && images.len() >= self.parallel_min_images {
            images
                .par_iter()
                .filter_map(|image| Self::match_image(&term, image))
                .collect()
        } else {
            images
                .iter()
                .filter_map(|image| Self::match_image(&term, image))
                .collect()
        }
    }

    /// One evidence entry per satisfying token, using its strongest match kind
    fn match_image(term: &str, image: &ImageRecord) -> Option<(ImageId, BTreeSet<MatchEvidence>)> {
        let evidence: BTreeSet<MatchEvidence> = image
            .tokens
            .iter()
            .enumerate()
            .filter_map(|(token_index, token)| {
                match_token(term, &token.normalized).map(|kind| MatchEvidence {
                    image_id: image.id,
                    term: term.to_string(),
                    token_index,
                    token: token.text.clone(),
                    kind,
                    bbox: token.bbox,
                })
            })
            .collect();

        (!evidence.is_empty()).then_some((image.id, evidence))
    }

    fn combine(node: &QueryNode, hits: &FxHashMap<&str, EvidenceMap>) -> EvidenceMap {
        match node {
            QueryNode::Term(term) => hits.get(term.as_str()).cloned().unwrap_or_default(),
            QueryNode::And(left, right) => {
                let left = Self::combine(left, hits);
                if left.is_empty() {
                    return left;
                }
                let mut right = Self::combine(right, hits);
                left.into_iter()
                    .filter_map(|(id, mut evidence)| {
                        right.remove(&id).map(|more| {
                            evidence.extend(more);
                            (id, evidence)
                        })
                    })
                    .collect()
            }
            QueryNode::Or(left, right) => {
                let mut merged = Self::combine(left, hits);
                for (id, evidence) in Self::combine(right, hits) {
                    merged.entry(id).or_default().extend(evidence);
                }
                merged
            }
            QueryNode::Empty => EvidenceMap::new(),
        }
    }
}
