//! Output generation for a finished run.
//!
//! # Submodules
//!
//! - [`json`]: Writes a [`HarvestResult`](crate::models::HarvestResult) as an
//!   indented, Unicode-preserving JSON document
//!
//! # Output Structure
//!
//! ```text
//! response_with_statistics.json
//! {
//!   "articles": [ { "link", "title", "category", "date_published", "content" }, ... ],
//!   "statistics": { "num_articles", "total_words", "average_words", "most_common_words" }
//! }
//! ```

pub mod json;
