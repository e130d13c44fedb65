//! Ingestion boundary: raw OCR detections in, validated records out.

use crate::index::corpus::CorpusIndex;
use crate::index::error::IngestError;
use crate::index::types::{BoundingBox, ImageId, ImageRecord, TokenRecord};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Where on the image a detection was found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Region {
    /// Four corner points, clockwise from top-left, as OCR engines report them
    Quad([[f32; 2]; 4]),
    /// Already axis-aligned
    Box(BoundingBox),
}

impl Region {
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Region::Quad(points) => BoundingBox::from_quad(points),
            Region::Box(b) => *b,
        }
    }
}

/// One raw result from an OCR engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub text: String,
    pub region: Region,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Produces detections from encoded image bytes (OCR engines live behind this)
pub trait Extractor {
    fn extract(&self, image: &[u8]) -> Result<Vec<Detection>>;
}

/// Turn detections into validated token records.
///
/// Detections whose text normalizes to nothing are skipped; any other
/// invalid detection rejects the whole batch.
pub fn tokens_from_detections(detections: Vec<Detection>) -> Result<Vec<TokenRecord>, IngestError> {
    let mut tokens = Vec::with_capacity(detections.len());

    for (index, detection) in detections.into_iter().enumerate() {
        let token = TokenRecord::new(
            detection.text,
            detection.region.bounding_box(),
            detection.confidence,
        );
        if token.normalized.is_empty() {
            tracing::warn!(index, text = %token.text, "dropping detection with no searchable text");
            continue;
        }
        token.validate(index)?;
        tokens.push(token);
    }

    Ok(tokens)
}

/// Hex SHA-256 of the image bytes
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Run OCR on an image and index the result under `id`
pub fn ingest_image(
    index: &CorpusIndex,
    extractor: &dyn Extractor,
    id: ImageId,
    display_name: &str,
    image: &[u8],
) -> Result<ImageRecord> {
    let detections = extractor
        .extract(image)
        .with_context(|| format!("OCR failed for {}", display_name))?;
    let tokens = tokens_from_detections(detections)?;

    let record = ImageRecord::new(id, tokens)
        .with_display_name(display_name)
        .with_content_hash(content_hash(image));
    index.add_record(record.clone())?;

    Ok(record)
}
