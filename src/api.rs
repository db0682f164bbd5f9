//! Search-results provider interaction.
//!
//! This module turns a keyword into a ranked list of candidate article URLs
//! using a Google SERP API (HasData request and response shape).
//!
//! # Architecture
//!
//! - [`SearchProvider`]: Core trait the pipeline depends on
//! - [`SerpClient`]: HTTP implementation with bearer-token auth
//!
//! # Request
//!
//! ```text
//! GET {endpoint}?q=..&location=..&deviceType=..&gl=..&hl=..&num=..
//! Authorization: Bearer {api_key}
//! ```
//!
//! The response carries its ranked links under `organicResults[].link`.

use crate::config::SerpConfig;
use crate::error::SearchError;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Trait for anything that can rank candidate URLs for a keyword.
///
/// The pipeline is generic over this so tests can supply fixed link lists.
pub trait SearchProvider {
    /// Return candidate URLs for `keyword`, best first.
    async fn search(&self, keyword: &str) -> Result<Vec<String>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(rename = "organicResults", default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    link: Option<String>,
}

/// HTTP client for the SERP API.
pub struct SerpClient {
    client: Client,
    config: SerpConfig,
    api_key: Option<String>,
}

impl fmt::Debug for SerpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerpClient")
            .field("endpoint", &self.config.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SerpClient {
    /// Create a client for `config.endpoint`.
    ///
    /// A missing `api_key` is only reported when a search is attempted.
    pub fn new(
        config: SerpConfig,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn query(&self, keyword: &str) -> Vec<(&'static str, String)> {
        vec![
            ("q", keyword.to_string()),
            ("location", self.config.location.clone()),
            ("deviceType", self.config.device_type.clone()),
            ("gl", self.config.country.clone()),
            ("hl", self.config.language.clone()),
            ("num", self.config.num_results.to_string()),
        ]
    }
}

impl SearchProvider for SerpClient {
    #[instrument(level = "info", skip(self))]
    async fn search(&self, keyword: &str) -> Result<Vec<String>, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingApiKey)?;
        let t0 = Instant::now();

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&self.query(keyword))
            .bearer_auth(api_key)
            .send()
            .await?
            .error_for_status()?;
        let parsed: SerpResponse = response.json().await?;

        let total = parsed.organic_results.len();
        let links: Vec<String> = parsed
            .organic_results
            .into_iter()
            .filter_map(|result| result.link)
            .collect();
        if links.len() < total {
            warn!(dropped = total - links.len(), "Organic results without a link");
        }

        info!(
            count = links.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched search results"
        );
        Ok(links)
    }
}
