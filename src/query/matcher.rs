//! Per-token matching policy: exact, then substring, then fuzzy.

use crate::index::types::MatchKind;
use crate::utils::{is_fuzzy_match, max_distance_for};

/// Symmetric containment: either string is a contiguous part of the other
pub fn substring_match(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Strongest way a normalized `term` matches a normalized `token`, if any.
///
/// Empty strings never match; they would otherwise be a substring of everything.
pub fn match_token(term: &str, token: &str) -> Option<MatchKind> {
    if term.is_empty() || token.is_empty() {
        return None;
    }
    if term == token {
        return Some(MatchKind::Exact);
    }
    if substring_match(term, token) {
        return Some(MatchKind::Substring);
    }
    if is_fuzzy_match(term, token, max_distance_for(term)) {
        return Some(MatchKind::Fuzzy);
    }
    None
}
