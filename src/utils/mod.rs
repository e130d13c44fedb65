//! Utility functions and data structures.
//!
//! ## Modules
//!
//! - [`app_data`] - Configuration and data directory management (XDG-compliant)
//! - [`distance`] - Edit distance and the fuzzy acceptance policy
//! - [`progress`] - Progress bars for bulk imports
//! - [`tokenizer`] - Normalization shared by ingestion and queries
//!
//! ## Key Functions
//!
//! ```no_run
//! use ocrfind::utils::{edit_distance, normalize};
//!
//! let words = normalize("Invoice #42, PAID");
//! // Returns: ["invoice", "42", "paid"]
//!
//! let d = edit_distance("invoice", "invo1ce");
//! // Returns: 1
//! ```

pub mod app_data;
pub mod distance;
pub mod progress;
pub mod tokenizer;

pub use app_data::*;
pub use distance::*;
pub use tokenizer::*;
