//! Plain HTTP fetch strategy.
//!
//! Issues a direct GET with a desktop browser user agent. Any network error
//! or non-2xx status is a failure.

use super::PageFetcher;
use crate::error::FetchError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct PlainFetcher {
    client: Client,
}

impl PlainFetcher {
    /// Build a fetcher that sends `user_agent` and gives up after `timeout`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for PlainFetcher {
    fn name(&self) -> &'static str {
        "plain"
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
