//! Corpus builders shared by the integration tests.

#![allow(dead_code)]

use ocrfind::index::{BoundingBox, CorpusIndex, ImageId, TokenRecord};

/// Lay `words` out left to right on one line, 10px apart
pub fn line_of(words: &[&str]) -> Vec<TokenRecord> {
    let mut x = 0;
    words
        .iter()
        .map(|w| {
            let width = 8 * w.chars().count() as u32;
            let token = TokenRecord::new(*w, BoundingBox::new(x, 0, x + width, 16), Some(0.9));
            x += width + 10;
            token
        })
        .collect()
}

/// In-memory index holding one image per entry
pub fn index_of(images: &[(ImageId, &[&str])]) -> CorpusIndex {
    let index = CorpusIndex::in_memory();
    for (id, words) in images {
        index
            .add_image(*id, line_of(words))
            .expect("fixture tokens are valid");
    }
    index
}
