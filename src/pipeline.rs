//! The acceptance pipeline: from a keyword to a handful of usable articles.
//!
//! # Flow
//!
//! 1. **Search**: ask the [`SearchProvider`] for ranked links
//! 2. **Filter**: drop links whose domain is already denylisted
//! 3. **Fetch**: rendered DOM first, plain HTTP only if rendering fails outright
//! 4. **Accept**: keep pages with at least `min_content_chars` characters of
//!    content; denylist the domain of any page that comes back shorter
//!
//! Candidates are visited strictly one at a time, in ranked order, each at
//! most once. The loop keeps going while the accepted count is at most
//! `accepted_threshold`, so with the default of 3 a run accepts up to 4.

use crate::api::SearchProvider;
use crate::config::HarvestConfig;
use crate::denylist::Denylist;
use crate::error::{DenylistError, HarvestError};
use crate::models::ArticleRecord;
use crate::scrapers::{PageFetcher, scrape_page};
use crate::utils::domain_of;
use tracing::{debug, error, info, instrument, warn};

/// A search result together with the domain used for denylist checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub domain: String,
}

impl Candidate {
    /// `None` when no domain can be derived from `url`.
    pub fn new(url: String) -> Option<Self> {
        let domain = domain_of(&url)?.to_string();
        Some(Self { url, domain })
    }
}

/// Drives search, fetching, acceptance and denylist upkeep for one keyword.
pub struct Harvester<S, R, P> {
    search: S,
    rendered: R,
    plain: P,
    denylist: Denylist,
    min_content_chars: usize,
    accepted_threshold: usize,
}

impl<S, R, P> Harvester<S, R, P>
where
    S: SearchProvider,
    R: PageFetcher,
    P: PageFetcher,
{
    pub fn new(search: S, rendered: R, plain: P, denylist: Denylist, config: &HarvestConfig) -> Self {
        Self {
            search,
            rendered,
            plain,
            denylist,
            min_content_chars: config.min_content_chars,
            accepted_threshold: config.accepted_threshold,
        }
    }

    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    /// Collect accepted articles for `keyword`.
    ///
    /// # Errors
    ///
    /// - [`HarvestError::Search`] if the search provider fails; nothing is fetched.
    /// - [`HarvestError::Denylist`] if a rejected domain cannot be persisted.
    ///
    /// Per-candidate fetch and extraction failures are logged and skipped.
    #[instrument(level = "info", skip(self))]
    pub async fn run(&mut self, keyword: &str) -> Result<Vec<ArticleRecord>, HarvestError> {
        let links = match self.search.search(keyword).await {
            Ok(links) => links,
            Err(e) => {
                error!(%keyword, error = %e, "Failed to fetch search results");
                return Err(e.into());
            }
        };

        let candidates = self.candidates(links);
        info!(
            candidates = candidates.len(),
            denylisted = self.denylist.len(),
            "Built candidate list"
        );

        let mut accepted = Vec::new();
        let mut index = 0;
        while accepted.len() <= self.accepted_threshold && index < candidates.len() {
            let candidate = &candidates[index];
            index += 1;

            // Re-checked here: a domain can be denylisted after the list was built.
            if self.denylist.contains(&candidate.domain) {
                debug!(url = %candidate.url, domain = %candidate.domain, "Skipping denylisted domain");
                continue;
            }

            if let Some(article) = self.evaluate(candidate).await? {
                accepted.push(article);
            }
        }

        info!(
            accepted = accepted.len(),
            visited = index,
            "Finished candidate loop"
        );
        Ok(accepted)
    }

    fn candidates(&self, links: Vec<String>) -> Vec<Candidate> {
        links
            .into_iter()
            .filter_map(|url| {
                let candidate = Candidate::new(url.clone());
                if candidate.is_none() {
                    warn!(%url, "Cannot derive a domain; dropping link");
                }
                candidate
            })
            .filter(|candidate| !self.denylist.contains(&candidate.domain))
            .collect()
    }

    /// Fetch one candidate and apply the content-length rule.
    #[instrument(level = "info", skip_all, fields(url = %candidate.url))]
    async fn evaluate(&mut self, candidate: &Candidate) -> Result<Option<ArticleRecord>, DenylistError> {
        let Some(article) = fetch_with_fallback(&self.rendered, &self.plain, &candidate.url).await
        else {
            return Ok(None);
        };

        let chars = article.content_chars();
        if chars >= self.min_content_chars {
            info!(chars, title = %article.title, "Accepted article");
            return Ok(Some(article));
        }

        info!(
            chars,
            threshold = self.min_content_chars,
            domain = %candidate.domain,
            "Content too short; denylisting domain"
        );
        self.denylist.record(&candidate.domain).await?;
        Ok(None)
    }
}

/// Rendered DOM first; plain fetch only if that fails outright.
///
/// Returns `None` when both strategies fail.
pub async fn fetch_with_fallback<R, P>(rendered: &R, plain: &P, url: &str) -> Option<ArticleRecord>
where
    R: PageFetcher,
    P: PageFetcher,
{
    match scrape_page(rendered, url).await {
        Ok(article) => return Some(article),
        Err(e) => warn!(%url, error = %e, "Rendered fetch failed; falling back to plain fetch"),
    }

    match scrape_page(plain, url).await {
        Ok(article) => Some(article),
        Err(e) => {
            warn!(%url, error = %e, "Plain fetch failed; skipping candidate");
            None
        }
    }
}

/// Scrape explicit URLs without search, acceptance rule or denylist.
///
/// Every page that can be fetched and extracted is kept, in input order.
#[instrument(level = "info", skip_all, fields(count = urls.len()))]
pub async fn scrape_direct<R, P>(rendered: &R, plain: &P, urls: &[String]) -> Vec<ArticleRecord>
where
    R: PageFetcher,
    P: PageFetcher,
{
    let mut articles = Vec::with_capacity(urls.len());
    for url in urls {
        if let Some(article) = fetch_with_fallback(rendered, plain, url).await {
            info!(%url, chars = article.content_chars(), "Scraped article");
            articles.push(article);
        }
    }
    articles
}
