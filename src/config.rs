//! Runtime configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an absent file, an empty file, or a file that
//! sets only a few keys are all valid:
//!
//! ```yaml
//! min_content_chars: 1500
//! fetch_timeout_secs: 45
//! serp:
//!   location: Germany
//!   country: de
//!   language: de
//! ```

use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_SERP_ENDPOINT: &str = "http://api.hasdata.com/google-serp/serp";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Parameters sent with every search-results request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerpConfig {
    pub endpoint: String,
    pub location: String,
    pub device_type: String,
    /// Google `gl` parameter.
    pub country: String,
    /// Google `hl` parameter.
    pub language: String,
    pub num_results: u32,
}

impl Default for SerpConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SERP_ENDPOINT.to_string(),
            location: "Poland".to_string(),
            device_type: "desktop".to_string(),
            country: "pl".to_string(),
            language: "pl".to_string(),
            num_results: 10,
        }
    }
}

/// Top-level configuration for a harvesting run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub serp: SerpConfig,
    /// Pages with fewer content characters than this are rejected.
    pub min_content_chars: usize,
    /// The candidate loop keeps going while `accepted <= accepted_threshold`.
    pub accepted_threshold: usize,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    /// Chromium binary for the rendered-DOM strategy; auto-detected when unset.
    pub chrome_executable: Option<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            serp: SerpConfig::default(),
            min_content_chars: 1500,
            accepted_threshold: 3,
            fetch_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chrome_executable: None,
        }
    }
}

impl HarvestConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Load configuration from `path`, or defaults when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML for
/// [`HarvestConfig`]. A named file that does not exist is an error.
#[instrument(level = "info")]
pub async fn load_config(path: Option<&Path>) -> Result<HarvestConfig, Box<dyn Error>> {
    let Some(path) = path else {
        info!("No config file given; using defaults");
        return Ok(HarvestConfig::default());
    };

    let raw = tokio::fs::read_to_string(path).await?;
    let config = parse_config(&raw)?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

fn parse_config(raw: &str) -> Result<HarvestConfig, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(HarvestConfig::default());
    }
    serde_yaml::from_str(raw)
}
