//! JSON output for a harvesting run.
//!
//! The document is pretty-printed with two-space indentation. Non-ASCII text
//! (Polish article bodies, for instance) is written as UTF-8, not escaped.

use crate::models::HarvestResult;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `result` to a pretty JSON string.
pub fn to_pretty_json(result: &HarvestResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Write `result` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails. Callers treat
/// this as fatal.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_result(result: &HarvestResult, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = to_pretty_json(result)?;

    info!(bytes = json.len(), "Writing JSON");
    if let Err(e) = fs::write(path, json).await {
        error!(error = %e, "Failed to write JSON output");
        return Err(e.into());
    }
    info!(articles = result.articles.len(), "Wrote JSON output");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;

    fn result() -> HarvestResult {
        HarvestResult::assemble(vec![ArticleRecord {
            link: "https://gram.pl/artykul/gry".to_string(),
            title: "Najlepsze gry planszowe".to_string(),
            category: "Gry, Planszówki".to_string(),
            date_published: "2024-01-15 10:30:00".to_string(),
            content: "Zażółć gęślą jaźń".to_string(),
        }])
    }

    #[test]
    fn test_json_is_indented_and_unicode_preserved() {
        let json = to_pretty_json(&result()).unwrap();

        assert!(json.starts_with("{\n  \"articles\": [\n    {\n"));
        assert!(json.contains("Zażółć gęślą jaźń"));
        assert!(json.contains("Planszówki"));
        assert!(!json.contains("\\u"));
    }

    #[tokio::test]
    async fn test_write_result_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("response_with_statistics.json");
        let original = result();

        write_result(&original, &path).await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: HarvestResult = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, original);
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("no-such-dir").join("out.json");
        assert!(write_result(&result(), &path).await.is_err());
    }
}
