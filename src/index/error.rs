//! Error types for ingestion and record storage

use thiserror::Error;

/// Errors raised by a [`Store`](crate::index::store::Store) implementation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced at the ingestion boundary.
///
/// Invalid records are rejected whole; nothing partial enters the index.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Malformed token record at {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Token record at {index} has no text")]
    EmptyText { index: usize },

    #[error("Token record at {index} has confidence {value} outside [0, 1]")]
    InvalidConfidence { index: usize, value: f32 },

    #[error("Store failed: {0}")]
    Store(#[from] StoreError),
}
