//! Rendered-DOM fetch strategy over headless Chromium.
//!
//! Some sites only inject their JSON-LD (and with it category and publish
//! date) from client-side script, so this strategy is tried first. Each call
//! launches its own browser and tears it down again, whether navigation
//! succeeded or not.

use super::PageFetcher;
use crate::error::FetchError;
use chromiumoxide::{Browser, BrowserConfig, Handler};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// Upper bound on browser shutdown, independent of the fetch timeout.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct RenderedFetcher {
    user_agent: String,
    timeout: Duration,
    chrome_executable: Option<String>,
}

impl RenderedFetcher {
    pub fn new(user_agent: &str, timeout: Duration, chrome_executable: Option<String>) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            timeout,
            chrome_executable,
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, FetchError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", self.user_agent));
        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(FetchError::Browser)
    }
}

/// A launched browser plus the task driving its CDP event loop.
///
/// [`BrowserSession::close`] must be awaited on every exit path; `Drop` on
/// [`Browser`] only kills the child process as a last resort.
struct BrowserSession {
    browser: Browser,
    events: JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(config: BrowserConfig) -> Result<Self, FetchError> {
        let (browser, handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        let events = tokio::spawn(drive_events(handler));
        Ok(Self { browser, events })
    }

    async fn page_source(&self, url: &str) -> Result<String, FetchError> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        page.content()
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))
    }

    async fn close(mut self) {
        let shutdown = async {
            if let Err(e) = self.browser.close().await {
                warn!(error = %e, "Browser close failed");
            }
            if let Err(e) = self.browser.wait().await {
                warn!(error = %e, "Waiting for browser exit failed");
            }
        };
        if tokio::time::timeout(CLOSE_TIMEOUT, shutdown).await.is_err() {
            warn!(timeout = ?CLOSE_TIMEOUT, "Browser did not shut down in time");
        }
        self.events.abort();
    }
}

/// Pump CDP events until the connection closes. Individual event errors,
/// such as messages the protocol bindings cannot decode, are not fatal.
async fn drive_events(mut handler: Handler) {
    while let Some(event) = handler.next().await {
        if let Err(e) = event {
            debug!(error = %e, "CDP handler error");
        }
    }
}

impl PageFetcher for RenderedFetcher {
    fn name(&self) -> &'static str {
        "rendered"
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let session = BrowserSession::launch(self.browser_config()?).await?;

        let outcome = tokio::time::timeout(self.timeout, session.page_source(url))
            .await
            .unwrap_or(Err(FetchError::Timeout(self.timeout)));

        session.close().await;

        let source = outcome?;
        debug!(bytes = source.len(), "Rendered page");
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_USER_AGENT;
    use crate::pipeline::fetch_with_fallback;
    use crate::scrapers::plain::PlainFetcher;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn missing_browser() -> RenderedFetcher {
        RenderedFetcher::new(
            DEFAULT_USER_AGENT,
            Duration::from_secs(1),
            Some("/nonexistent/chrome".to_string()),
        )
    }

    #[test]
    fn test_name() {
        let fetcher = RenderedFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5), None);
        assert_eq!(fetcher.name(), "rendered");
    }

    #[tokio::test]
    async fn test_launch_failure_is_browser_error() {
        let err = missing_browser()
            .fetch("http://127.0.0.1:9/")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Browser(_)));
    }

    #[tokio::test]
    async fn test_launch_failure_falls_back_to_plain_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/artykul"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><head><title>Ranking gier</title></head><body><p>Treść</p></body></html>",
                "text/html; charset=utf-8",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let plain = PlainFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();
        let url = format!("{}/artykul", server.uri());
        let article = fetch_with_fallback(&missing_browser(), &plain, &url)
            .await
            .unwrap();

        assert_eq!(article.link, url);
        assert_eq!(article.title, "Ranking gier");
        assert_eq!(article.content, "Treść");
    }
}
