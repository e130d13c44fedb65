use regex::Regex;
use std::sync::LazyLock;

/// Separators between words: whitespace plus the punctuation OCR engines
/// commonly glue onto recognized words.
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\s.,;:!?"'`()\[\]{}<>/\\|*#@&+=~^$%_\-–—…“”‘’]+"#)
        .expect("separator pattern is valid")
});

/// Split raw OCR text into normalized word tokens.
///
/// Splits on whitespace and the fixed punctuation set, lowercases and drops
/// empty pieces. The same function runs at ingestion and at query time so
/// that an exact match on stored text is always reproducible from a query.
pub fn normalize(raw: &str) -> Vec<String> {
    SEPARATORS
        .split(raw)
        .filter(|piece| !piece.is_empty())
        .map(|piece| piece.to_lowercase())
        .collect()
}

/// Normalized form of a whole text fragment, words joined by a single space.
///
/// An OCR detection may cover several words ("time table"); its tokens are
/// kept together so the box stays linked to every word it contains.
pub fn normalize_text(raw: &str) -> String {
    normalize(raw).join(" ")
}
