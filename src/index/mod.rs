pub mod corpus;
pub mod error;
pub mod ingest;
pub mod stats;
pub mod store;
pub mod types;

pub use corpus::{CorpusIndex, CorpusSnapshot};
pub use error::{IngestError, StoreError};
pub use store::{JsonDirStore, MemoryStore, Store};
pub use types::*;
