//! Command-line interface definitions for Serp Harvest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The search API key can come from the environment instead of a flag.

use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Command-line arguments for the Serp Harvest application.
///
/// Either a `--keyword` (search, then accept up to four articles) or one or
/// more `--url` values (scrape exactly those pages) must be given.
///
/// # Examples
///
/// ```sh
/// # Search mode
/// serp_harvest -k "najlepsze gry planszowe 2024" --api-key YOUR_KEY
///
/// # Direct mode, no search API involved
/// serp_harvest -u https://www.gram.pl/artykul/top-10 -u https://planszeo.pl/kalendarz -o response.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Keyword to search for
    #[arg(short, long, required_unless_present = "url", conflicts_with = "url")]
    pub keyword: Option<String>,

    /// Scrape this URL directly instead of searching (repeatable)
    #[arg(short, long, value_parser = parse_http_url)]
    pub url: Vec<String>,

    /// Path of the JSON result file
    #[arg(short, long, default_value = "response_with_statistics.json")]
    pub output: PathBuf,

    /// Path of the denylisted-domains file
    #[arg(short, long, default_value = "banned_domains.txt")]
    pub denylist: PathBuf,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Search-results API key
    #[arg(long, env = "SERP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Accept only absolute `http` or `https` URLs.
fn parse_http_url(raw: &str) -> Result<String, String> {
    let parsed = Url::parse(raw).map_err(|e| format!("invalid URL {raw:?}: {e}"))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(raw.to_string()),
        other => Err(format!("unsupported URL {raw:?} (scheme {other:?})")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_keyword_mode_defaults() {
        let cli = Cli::parse_from(["serp_harvest", "--keyword", "gry planszowe"]);

        assert_eq!(cli.keyword.as_deref(), Some("gry planszowe"));
        assert!(cli.url.is_empty());
        assert_eq!(cli.output, PathBuf::from("response_with_statistics.json"));
        assert_eq!(cli.denylist, PathBuf::from("banned_domains.txt"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "serp_harvest",
            "-k",
            "kw",
            "-o",
            "/tmp/out.json",
            "-d",
            "/tmp/banned.txt",
            "-c",
            "/tmp/config.yaml",
        ]);

        assert_eq!(cli.output, PathBuf::from("/tmp/out.json"));
        assert_eq!(cli.denylist, PathBuf::from("/tmp/banned.txt"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.yaml")));
    }

    #[test]
    fn test_cli_direct_urls() {
        let cli = Cli::parse_from([
            "serp_harvest",
            "-u",
            "https://www.gram.pl/artykul/a",
            "--url",
            "https://planszeo.pl/kalendarz",
        ]);

        assert!(cli.keyword.is_none());
        assert_eq!(
            cli.url,
            vec!["https://www.gram.pl/artykul/a", "https://planszeo.pl/kalendarz"]
        );
    }

    #[test]
    fn test_cli_requires_keyword_or_url() {
        assert!(Cli::try_parse_from(["serp_harvest"]).is_err());
    }

    #[test]
    fn test_cli_keyword_and_url_conflict() {
        assert!(
            Cli::try_parse_from(["serp_harvest", "-k", "kw", "-u", "https://a.example/"]).is_err()
        );
    }

    #[test]
    fn test_cli_rejects_non_http_url() {
        assert!(Cli::try_parse_from(["serp_harvest", "-u", "ftp://a.example/file"]).is_err());
        assert!(Cli::try_parse_from(["serp_harvest", "-u", "not a url"]).is_err());
    }
}
