pub mod assembler;
pub mod evaluator;
pub mod matcher;
pub mod parser;

pub use assembler::assemble;
pub use evaluator::{EvidenceMap, QueryEvaluator};
pub use matcher::{match_token, substring_match};
pub use parser::{parse_query, Query, QueryNode};

use crate::index::corpus::CorpusSnapshot;
use crate::index::types::ImageMatch;
use std::time::Instant;

/// Knobs for a single search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum results (0 = unlimited)
    pub limit: usize,
    /// Allow per-image matching to run on the rayon pool
    pub parallel: bool,
    /// Minimum snapshot size before going parallel
    pub parallel_min_images: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 0,
            parallel: true,
            parallel_min_images: 256,
        }
    }
}

/// Parse, evaluate and assemble a query against a snapshot.
///
/// Total: an empty or unmatched query yields an empty sequence.
pub fn search(query: &str, snapshot: &CorpusSnapshot) -> Vec<ImageMatch> {
    search_with(query, snapshot, &SearchOptions::default())
}

/// [`search`] with explicit options
pub fn search_with(query: &str, snapshot: &CorpusSnapshot, options: &SearchOptions) -> Vec<ImageMatch> {
    let start = Instant::now();

    let parsed = parse_query(query);
    let evidence = QueryEvaluator::with_options(snapshot, options).evaluate(&parsed.root);
    let mut results = assemble(evidence);

    if options.limit > 0 {
        results.truncate(options.limit);
    }

    tracing::debug!(
        query,
        results = results.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "search finished"
    );
    results
}
