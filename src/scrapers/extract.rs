//! Field extraction from a parsed article page.
//!
//! Each field is resolved through an ordered chain of probes. Structured data
//! (`<script type="application/ld+json">`) is consulted first, then `<meta>`
//! tags, then visible markup. The first probe that yields a value wins, with
//! one exception: for `datePublished` the *last* JSON-LD block that carries the
//! key wins, because later blocks overwrite earlier ones.
//!
//! Malformed JSON-LD blocks are skipped without error. The only hard failure
//! is a page with no `<title>`.

use crate::error::ExtractError;
use crate::models::ArticleRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

/// Category used when no structured data or meta tag supplies one.
pub const NO_CATEGORY: &str = "No category found";

const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static JSON_LD: Lazy<Selector> =
    Lazy::new(|| selector(r#"script[type="application/ld+json"]"#));
static CONTENT: Lazy<Selector> = Lazy::new(|| selector("h2, h3, p"));
static TIME: Lazy<Selector> = Lazy::new(|| selector("time"));

static CATEGORY_META: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        r#"meta[name="category"][content]"#,
        r#"meta[name="keywords"][content]"#,
        r#"meta[name="news_keywords"][content]"#,
        r#"meta[property="article:section"][content]"#,
    ]
    .into_iter()
    .map(selector)
    .collect()
});
static PUBLISHED_TIME_META: Lazy<Vec<Selector>> =
    Lazy::new(|| vec![selector(r#"meta[property="article:published_time"][content]"#)]);
static PUBDATE_META: Lazy<Vec<Selector>> =
    Lazy::new(|| vec![selector(r#"meta[name="pubdate"][content]"#)]);

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector")
}

/// The fields pulled out of one page, before the page URL is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: String,
    pub category: String,
    pub date_published: String,
    pub content: String,
}

impl ExtractedFields {
    pub fn into_record(self, link: &str) -> ArticleRecord {
        ArticleRecord {
            link: link.to_string(),
            title: self.title,
            category: self.category,
            date_published: self.date_published,
            content: self.content,
        }
    }
}

/// Run every probe chain against `document`.
///
/// # Errors
///
/// [`ExtractError::MissingTitle`] when the page has no `<title>` element.
pub fn extract(document: &Html) -> Result<ExtractedFields, ExtractError> {
    let title = extract_title(document)?;
    let blocks = structured_blocks(document);

    Ok(ExtractedFields {
        title,
        category: extract_category(document, &blocks),
        date_published: extract_date_published(document, &blocks),
        content: extract_content(document),
    })
}

/// One step of a fallback chain.
pub type Probe<'a, T> = dyn Fn() -> Option<T> + 'a;

/// Evaluate `probes` in order and return the first value produced.
///
/// Later probes are not run once one succeeds.
pub fn first_some<T>(probes: &[&Probe<'_, T>]) -> Option<T> {
    probes.iter().find_map(|probe| probe())
}

pub fn extract_title(document: &Html) -> Result<String, ExtractError> {
    document
        .select(&TITLE)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .ok_or(ExtractError::MissingTitle)
}

/// Parse every JSON-LD block in document order, dropping the ones that are
/// empty or not valid JSON.
pub fn structured_blocks(document: &Html) -> Vec<Value> {
    document
        .select(&JSON_LD)
        .filter_map(|script| {
            let raw = script.text().collect::<String>();
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            match serde_json::from_str::<Value>(raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping malformed JSON-LD block");
                    None
                }
            }
        })
        .collect()
}

pub fn extract_category(document: &Html, blocks: &[Value]) -> String {
    let probes: [&Probe<String>; 2] = [
        &|| structured_category(blocks),
        &|| meta_content(document, &CATEGORY_META),
    ];
    first_some(&probes).unwrap_or_else(|| NO_CATEGORY.to_string())
}

/// Per block in order: `keywords` if present, else `articleSection`.
///
/// A block carrying neither key does not stop the scan.
fn structured_category(blocks: &[Value]) -> Option<String> {
    blocks.iter().find_map(|block| {
        block
            .get("keywords")
            .and_then(joined_values)
            .or_else(|| block.get("articleSection").and_then(joined_values))
    })
}

/// Join a list of strings with `", "`. A single string is returned as-is.
fn joined_values(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Array(items) => Some(items.iter().filter_map(Value::as_str).join(", ")),
        _ => None,
    }
}

pub fn extract_date_published(document: &Html, blocks: &[Value]) -> String {
    let probes: [&Probe<String>; 4] = [
        &|| structured_date(blocks).and_then(non_empty),
        &|| meta_content(document, &PUBLISHED_TIME_META).and_then(non_empty),
        &|| meta_content(document, &PUBDATE_META).and_then(non_empty),
        &|| first_time_text(document).and_then(non_empty),
    ];
    first_some(&probes).unwrap_or_default()
}

/// The last block with a string `datePublished` decides.
fn structured_date(blocks: &[Value]) -> Option<String> {
    blocks
        .iter()
        .filter_map(|block| block.get("datePublished").and_then(Value::as_str))
        .map(normalize_iso_date)
        .last()
}

fn first_time_text(document: &Html) -> Option<String> {
    document
        .select(&TIME)
        .next()
        .map(|time| time.text().collect::<String>().replace('\n', ""))
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// `content` attribute of the first element matched, trying selectors in order.
fn meta_content(document: &Html, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|sel| {
        document
            .select(sel)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(str::to_string)
    })
}

/// Reformat an ISO-8601 timestamp as `YYYY-MM-DD HH:MM:SS`.
///
/// Trailing `Z`s are stripped first. Timestamps with a UTC offset keep their
/// wall-clock time. Anything that does not parse is returned unchanged.
pub fn normalize_iso_date(raw: &str) -> String {
    parse_iso(raw.trim_end_matches('Z'))
        .map(|dt| dt.format(OUTPUT_DATE_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    const WITH_OFFSET: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M%:z",
    ];
    const NAIVE: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    WITH_OFFSET
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.naive_local())
        .or_else(|| {
            NAIVE
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Text of every `h2`, `h3` and `p` in document order.
///
/// Text nodes inside one element are joined with `\n`; nothing is inserted
/// between elements.
pub fn extract_content(document: &Html) -> String {
    document.select(&CONTENT).map(element_text).collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().join("\n")
}
