//! # Serp Harvest
//!
//! Discovers articles for a keyword through a search-results API, extracts
//! title, category, publish date and body text from each page, and writes the
//! accepted articles together with word statistics as one JSON document.
//!
//! ## Usage
//!
//! ```sh
//! SERP_API_KEY=... serp_harvest -k "najlepsze gry planszowe 2024"
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Search**: Rank candidate URLs for the keyword
//! 2. **Fetching**: Rendered DOM first, plain HTTP as fallback, one page at a time
//! 3. **Acceptance**: Keep pages with enough content, denylist domains without
//! 4. **Output**: Aggregate word statistics and write the JSON result

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod denylist;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod stats;
mod utils;

use api::SerpClient;
use cli::Cli;
use config::{HarvestConfig, load_config};
use denylist::Denylist;
use error::HarvestError;
use models::{ArticleRecord, HarvestResult};
use outputs::json;
use pipeline::{Harvester, scrape_direct};
use scrapers::plain::PlainFetcher;
use scrapers::rendered::RenderedFetcher;
use utils::{ensure_writable_parent, truncate_for_log};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("serp_harvest starting up");

    let args = Cli::parse();
    debug!(keyword = ?args.keyword, urls = args.url.len(), output = %args.output.display(), "Parsed CLI arguments");

    // Early check: fail before any network work if the result cannot be written
    if let Err(e) = ensure_writable_parent(&args.output).await {
        error!(
            path = %args.output.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let config = load_config(args.config.as_deref()).await?;
    let rendered = RenderedFetcher::new(
        &config.user_agent,
        config.fetch_timeout(),
        config.chrome_executable.clone(),
    );
    let plain = PlainFetcher::new(&config.user_agent, config.fetch_timeout())?;

    let articles = match &args.keyword {
        Some(keyword) => harvest_keyword(keyword, &args, &config, rendered, plain).await?,
        None => scrape_direct(&rendered, &plain, &args.url).await,
    };

    if articles.is_empty() {
        warn!("No articles were scraped");
        return Ok(());
    }

    for article in &articles {
        debug!(
            link = %article.link,
            title = %article.title,
            category = %article.category,
            date_published = %article.date_published,
            content = %truncate_for_log(&article.content, 120),
            "Article"
        );
    }

    let result = HarvestResult::assemble(articles);
    info!(
        num_articles = result.statistics.num_articles,
        total_words = result.statistics.total_words,
        average_words = result.statistics.average_words,
        most_common = ?result.statistics.most_common_words,
        "Computed statistics"
    );

    json::write_result(&result, &args.output).await?;
    info!(path = %args.output.display(), "Output generated");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Run the acceptance pipeline for one keyword.
///
/// A search-provider failure ends the run with no articles; it is logged,
/// not returned as a process error. Denylist failures are returned.
async fn harvest_keyword(
    keyword: &str,
    args: &Cli,
    config: &HarvestConfig,
    rendered: RenderedFetcher,
    plain: PlainFetcher,
) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
    let denylist = Denylist::load(&args.denylist).await?;
    let search = SerpClient::new(
        config.serp.clone(),
        args.api_key.clone(),
        config.fetch_timeout(),
    )?;

    let mut harvester = Harvester::new(search, rendered, plain, denylist, config);
    let outcome = harvester.run(keyword).await;
    if harvester.denylist().is_empty() {
        debug!("Denylist is empty after run");
    } else {
        info!(denylisted = harvester.denylist().len(), "Denylist size after run");
    }

    match outcome {
        Ok(articles) => Ok(articles),
        Err(HarvestError::Search(e)) => {
            error!(%keyword, error = %e, "Search failed; no articles for this keyword");
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}
