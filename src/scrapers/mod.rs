//! Page acquisition and field extraction.
//!
//! Two interchangeable strategies implement [`PageFetcher`]:
//!
//! | Strategy | Module | Backend | Notes |
//! |----------|--------|---------|-------|
//! | Rendered DOM | [`rendered`] | headless Chromium | Sees JSON-LD injected by client-side script |
//! | Plain fetch | [`plain`] | `reqwest` GET | Cheaper; used as the fallback |
//!
//! Both return the page source; [`scrape_page`] parses it and runs the
//! [`extract`] chains to build an [`ArticleRecord`].

pub mod extract;
pub mod plain;
pub mod rendered;

use crate::error::{ExtractError, FetchError};
use crate::models::ArticleRecord;
use scraper::Html;
use tracing::{debug, instrument};

/// A way of turning a URL into page source.
///
/// Implementations must signal failure rather than return a partial page.
pub trait PageFetcher {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetch `url` with `fetcher` and extract an [`ArticleRecord`] from it.
///
/// # Errors
///
/// Any fetch failure, or [`ExtractError::MissingTitle`] wrapped in
/// [`FetchError::Extract`].
#[instrument(level = "info", skip(fetcher), fields(strategy = fetcher.name()))]
pub async fn scrape_page<F: PageFetcher>(fetcher: &F, url: &str) -> Result<ArticleRecord, FetchError> {
    let source = fetcher.fetch(url).await?;
    let record = parse_article(url, &source)?;
    debug!(chars = record.content_chars(), title = %record.title, "Extracted article");
    Ok(record)
}

/// Parse `source` as HTML and extract the article fields.
pub fn parse_article(url: &str, source: &str) -> Result<ArticleRecord, ExtractError> {
    let document = Html::parse_document(source);
    extract::extract(&document).map(|fields| fields.into_record(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticPage(&'static str);

    impl PageFetcher for StaticPage {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_scrape_page_builds_record() {
        let fetcher = StaticPage("<html><head><title>Hello</title></head><body><p>Body</p></body></html>");
        let record = scrape_page(&fetcher, "https://example.com/x").await.unwrap();

        assert_eq!(record.link, "https://example.com/x");
        assert_eq!(record.title, "Hello");
        assert_eq!(record.category, extract::NO_CATEGORY);
        assert_eq!(record.date_published, "");
        assert_eq!(record.content, "Body");
    }

    #[tokio::test]
    async fn test_scrape_page_without_title_fails() {
        let fetcher = StaticPage("<html><body><p>Body</p></body></html>");
        let err = scrape_page(&fetcher, "https://example.com/x").await.unwrap_err();
        assert!(matches!(err, FetchError::Extract(ExtractError::MissingTitle)));
    }
}
