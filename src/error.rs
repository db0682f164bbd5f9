//! Error types for the harvesting pipeline.
//!
//! Failures are split by how far they are allowed to travel:
//!
//! - [`FetchError`] and [`ExtractError`] concern a single candidate URL and are
//!   recovered inside the pipeline (fallback strategy or skip).
//! - [`SearchError`] aborts the run for one keyword.
//! - [`DenylistError`] is fatal: losing a denylist write is not tolerated.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A required field could not be extracted from a parsed page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("document has no <title> element")]
    MissingTitle,
}

/// Failure of one fetch strategy for one URL.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("browser automation failed: {0}")]
    Browser(String),
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

/// Failure talking to the search-results provider.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no search API key configured (set --api-key or SERP_API_KEY)")]
    MissingApiKey,
}

/// Failure reading or appending the persisted denylist.
#[derive(Error, Debug)]
pub enum DenylistError {
    #[error("denylist I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure that aborts a whole keyword run.
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Denylist(#[from] DenylistError),
}
