//! # ocrfind - Search over OCR word boxes
//!
//! ocrfind turns per-image OCR output (recognized words and their bounding
//! boxes) into a searchable corpus with Boolean keyword logic, substring
//! containment and typo-tolerant fuzzy matching. Every hit carries the box of
//! the word that produced it so viewers can draw highlight overlays.
//!
//! ## Architecture
//!
//! - [`index`] - Records, validation at ingestion, stores and snapshots
//! - [`query`] - Query parsing, per-token matching, evaluation and result assembly
//! - [`output`] - Terminal rendering of results
//! - [`utils`] - Normalization, edit distance and configuration
//!
//! ## Quick Start
//!
//! ```ignore
//! use ocrfind::index::{BoundingBox, CorpusIndex, TokenRecord};
//!
//! let index = CorpusIndex::in_memory();
//! index.add_image(1, vec![TokenRecord::new("Invoice", BoundingBox::new(4, 4, 80, 20), Some(0.97))])?;
//!
//! for hit in ocrfind::search("invo1ce OR receipt", &index.snapshot()) {
//!     for evidence in &hit.evidence {
//!         println!("{} {:?} {:?}", hit.image_id, evidence.kind, evidence.bbox);
//!     }
//! }
//! ```
//!
//! ## Matching
//!
//! A term matches a token when the two are equal, when either contains the
//! other, or when they are within a length-banded edit distance (1 edit up
//! to 5 characters, 2 up to 10, 3 beyond). `AND`/`OR` fold strictly left to
//! right and adjacent terms are OR'd.

pub mod index;
pub mod output;
pub mod query;
pub mod utils;

pub use query::{search, search_with, SearchOptions};
