//! Utility functions for URL handling, log formatting, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Domain derivation for denylist lookups
//! - String truncation for logging long page text
//! - File system validation for the output location

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Derive the domain of a URL as its third `/`-delimited segment.
///
/// For `https://www.example.com/a/b` this is `www.example.com`. Port and
/// userinfo are kept as written, so `http://host:8080/x` yields `host:8080`.
///
/// # Returns
///
/// `None` when the URL has fewer than three segments or the segment is empty.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(domain_of("https://gram.pl/artykul/1"), Some("gram.pl"));
/// assert_eq!(domain_of("not a url"), None);
/// ```
pub fn domain_of(url: &str) -> Option<&str> {
    url.split('/').nth(2).filter(|segment| !segment.is_empty())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the characters that were dropped. Counting is by `char`, so multi-byte
/// text is never split mid-character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => {
            let dropped = s[cut..].chars().count();
            format!("{}…(+{} chars)", &s[..cut], dropped)
        }
    }
}

/// Ensure the directory that will hold `file_path` exists and is writable.
///
/// This function creates the parent directory if it doesn't exist, then
/// performs a write test by creating and immediately deleting a probe file.
/// A bare file name is checked against the current directory.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %file_path.display()))]
pub async fn ensure_writable_parent(file_path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).await?;

    // Try a small sync write using std fs (simpler error surface)
    let probe_path = dir.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            if let Err(e) = stdfs::remove_file(&probe_path) {
                debug!(path = %probe_path.display(), error = %e, "Could not remove write-test file");
            }
            info!(dir = %dir.display(), "Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
