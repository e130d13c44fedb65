use crate::index::error::IngestError;
use crate::utils::normalize_text;
use serde::{Deserialize, Serialize};

/// Unique identifier for an indexed image
pub type ImageId = u64;

/// Axis-aligned pixel rectangle around a recognized word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl BoundingBox {
    pub fn new(x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    /// Build from the `[x, y, width, height]` form
    pub fn from_xywh(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    /// Smallest box containing every corner of an OCR quadrilateral.
    ///
    /// Negative coordinates are clamped to 0 and corners rounded to whole pixels.
    pub fn from_quad(points: &[[f32; 2]; 4]) -> Self {
        let to_px = |v: f32| v.max(0.0).round() as u32;
        let xs = points.iter().map(|p| to_px(p[0]));
        let ys = points.iter().map(|p| to_px(p[1]));
        Self::new(
            xs.clone().min().unwrap_or(0),
            ys.clone().min().unwrap_or(0),
            xs.max().unwrap_or(0),
            ys.max().unwrap_or(0),
        )
    }

    pub fn is_valid(&self) -> bool {
        self.x_min <= self.x_max && self.y_min <= self.y_max
    }

    pub fn width(&self) -> u32 {
        self.x_max.saturating_sub(self.x_min)
    }

    pub fn height(&self) -> u32 {
        self.y_max.saturating_sub(self.y_min)
    }

    /// `[x, y, width, height]` as consumed by highlight overlays
    pub fn to_xywh(&self) -> [u32; 4] {
        [self.x_min, self.y_min, self.width(), self.height()]
    }
}

/// One recognized word instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Raw recognized text
    pub text: String,
    /// Lowercased, punctuation-stripped form used for matching.
    /// Always re-derived from `text` before a record enters the index.
    pub normalized: String,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl TokenRecord {
    pub fn new(text: impl Into<String>, bbox: BoundingBox, confidence: Option<f32>) -> Self {
        let text = text.into();
        let normalized = normalize_text(&text);
        Self {
            text,
            normalized,
            bbox,
            confidence,
        }
    }

    /// Check the record invariants; `index` is its position within the image
    pub fn validate(&self, index: usize) -> Result<(), IngestError> {
        if self.text.trim().is_empty() {
            return Err(IngestError::EmptyText { index });
        }
        if !self.bbox.is_valid() {
            return Err(IngestError::MalformedRecord {
                index,
                reason: format!(
                    "box ({}, {}, {}, {}) has min > max",
                    self.bbox.x_min, self.bbox.y_min, self.bbox.x_max, self.bbox.y_max
                ),
            });
        }
        if let Some(value) = self.confidence {
            if !(0.0..=1.0).contains(&value) {
                return Err(IngestError::InvalidConfidence { index, value });
            }
        }
        Ok(())
    }
}

/// One indexed image and its recognized words in detection order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: ImageId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub content_hash: String,
    /// All recognized text, lowercased and space-joined
    #[serde(default)]
    pub full_text: String,
    pub tokens: Vec<TokenRecord>,
}

impl ImageRecord {
    pub fn new(id: ImageId, tokens: Vec<TokenRecord>) -> Self {
        let full_text = full_text_of(&tokens);

        Self {
            id,
            display_name: String::new(),
            content_hash: String::new(),
            full_text,
            tokens,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_content_hash(mut self, hash: impl Into<String>) -> Self {
        self.content_hash = hash.into();
        self
    }

    /// Recompute `normalized` and `full_text` from the raw token text
    pub fn renormalize(&mut self) {
        for token in &mut self.tokens {
            token.normalized = normalize_text(&token.text);
        }
        self.full_text = full_text_of(&self.tokens);
    }

    /// Validate every token, failing on the first bad one
    pub fn validate(&self) -> Result<(), IngestError> {
        self.tokens
            .iter()
            .enumerate()
            .try_for_each(|(index, token)| token.validate(index))
    }
}

fn full_text_of(tokens: &[TokenRecord]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Why a query term matched a token, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Substring,
    Fuzzy,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Substring => "substring",
            MatchKind::Fuzzy => "fuzzy",
        }
    }
}

/// A single token satisfying a single query term
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchEvidence {
    pub image_id: ImageId,
    /// Normalized query term
    pub term: String,
    /// Position of the token in its image's detection order
    pub token_index: usize,
    /// Raw text of the matched token
    pub token: String,
    pub kind: MatchKind,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// All evidence for one matching image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMatch {
    pub image_id: ImageId,
    pub evidence: Vec<MatchEvidence>,
    /// Number of distinct query terms that matched this image
    pub matched_terms: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_from_quad() {
        let quad = [[10.4, 5.0], [50.6, 4.0], [51.0, 20.2], [9.8, 21.0]];
        let b = BoundingBox::from_quad(&quad);
        assert_eq!(b, BoundingBox::new(10, 4, 51, 21));
    }

    #[test]
    fn test_box_from_quad_clamps_negative() {
        let quad = [[-3.0, -1.0], [8.0, -1.0], [8.0, 6.0], [-3.0, 6.0]];
        let b = BoundingBox::from_quad(&quad);
        assert_eq!(b, BoundingBox::new(0, 0, 8, 6));
    }

    #[test]
    fn test_box_xywh() {
        let b = BoundingBox::from_xywh(10, 20, 30, 40);
        assert_eq!(b, BoundingBox::new(10, 20, 40, 60));
        assert_eq!(b.to_xywh(), [10, 20, 30, 40]);
    }

    #[test]
    fn test_token_normalized_on_creation() {
        let t = TokenRecord::new("INVOICE:", BoundingBox::new(0, 0, 1, 1), Some(0.9));
        assert_eq!(t.text, "INVOICE:");
        assert_eq!(t.normalized, "invoice");
    }

    #[test]
    fn test_token_validate_rejects_inverted_box() {
        let t = TokenRecord::new("total", BoundingBox::new(10, 0, 5, 1), None);
        assert!(matches!(t.validate(3), Err(IngestError::MalformedRecord { index: 3, .. })));
    }

    #[test]
    fn test_token_validate_rejects_bad_confidence() {
        let t = TokenRecord::new("total", BoundingBox::new(0, 0, 5, 1), Some(1.5));
        assert!(matches!(t.validate(0), Err(IngestError::InvalidConfidence { .. })));
    }

    #[test]
    fn test_token_validate_rejects_empty_text() {
        let t = TokenRecord::new("  ", BoundingBox::new(0, 0, 5, 1), None);
        assert!(matches!(t.validate(0), Err(IngestError::EmptyText { index: 0 })));
    }

    #[test]
    fn test_image_full_text() {
        let img = ImageRecord::new(
            1,
            vec![
                TokenRecord::new("Budget", BoundingBox::new(0, 0, 5, 5), None),
                TokenRecord::new("2025", BoundingBox::new(6, 0, 9, 5), None),
            ],
        );
        assert_eq!(img.full_text, "budget 2025");
        assert!(img.validate().is_ok());
    }

    #[test]
    fn test_image_renormalize_overrides_stale_fields() {
        let mut token = TokenRecord::new("Invoice,", BoundingBox::new(0, 0, 5, 5), None);
        token.normalized = "receipt".to_string();
        let mut img = ImageRecord::new(1, vec![token]);
        img.full_text = "stale".to_string();

        img.renormalize();
        assert_eq!(img.tokens[0].normalized, "invoice");
        assert_eq!(img.full_text, "invoice,");
    }

    #[test]
    fn test_match_kind_strength_order() {
        assert!(MatchKind::Exact < MatchKind::Substring);
        assert!(MatchKind::Substring < MatchKind::Fuzzy);
    }

    #[test]
    fn test_token_serializes_box_field() {
        let t = TokenRecord::new("task", BoundingBox::new(1, 2, 3, 4), None);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["box"]["x_max"], 3);
        assert!(json.get("confidence").is_none());
    }
}
