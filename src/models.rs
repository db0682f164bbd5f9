//! Data models for harvested articles and run results.
//!
//! This module defines the records that flow out of the pipeline:
//! - [`ArticleRecord`]: One accepted page with its extracted fields
//! - [`Statistics`]: Corpus-level word counts over the accepted pages
//! - [`HarvestResult`]: The terminal output of a run, written as JSON
//!
//! Field names serialize as-is (snake_case) to match the output document
//! `{"articles": [...], "statistics": {...}}`.

use crate::stats;
use serde::{Deserialize, Serialize};

/// A page that passed extraction and acceptance.
///
/// Produced exactly once per accepted candidate and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The URL the page was fetched from.
    pub link: String,
    /// Trimmed text of the document's `<title>`.
    pub title: String,
    /// Comma-joined keywords or section, or `"No category found"`.
    pub category: String,
    /// `YYYY-MM-DD HH:MM:SS`, a raw passthrough, or empty.
    pub date_published: String,
    /// Plain text of every `h2`, `h3` and `p` in document order.
    pub content: String,
}

impl ArticleRecord {
    /// Length of the extracted content in characters (not bytes).
    pub fn content_chars(&self) -> usize {
        self.content.chars().count()
    }
}

/// Word statistics recomputed from the accepted articles of one run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Statistics {
    pub num_articles: usize,
    pub total_words: usize,
    pub average_words: f64,
    /// At most five `(word, count)` pairs, highest count first.
    pub most_common_words: Vec<(String, usize)>,
}

/// Articles plus their statistics: the document written at the end of a run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HarvestResult {
    pub articles: Vec<ArticleRecord>,
    pub statistics: Statistics,
}

impl HarvestResult {
    /// Compute statistics over `articles` and bundle both into one record.
    pub fn assemble(articles: Vec<ArticleRecord>) -> Self {
        let statistics = stats::aggregate(&articles);
        Self {
            articles,
            statistics,
        }
    }
}
