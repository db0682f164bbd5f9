//! Persistent set of domains that failed to yield enough content.
//!
//! The on-disk format is one domain per line, appended on every rejection and
//! read in full at startup. A missing file means an empty denylist.
//!
//! A default [`Denylist`] lives purely in memory, with no backing file.

use crate::error::DenylistError;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

#[derive(Debug, Default)]
pub struct Denylist {
    path: Option<PathBuf>,
    domains: HashSet<String>,
}

impl Denylist {
    /// A denylist with no backing file. Recorded domains are kept in memory only.
    #[cfg(test)]
    pub fn in_memory<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: None,
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }

    /// Read the denylist stored at `path`.
    ///
    /// Lines are trimmed and blank lines ignored. Duplicate lines are harmless.
    ///
    /// # Errors
    ///
    /// Any I/O error other than the file not existing.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DenylistError> {
        let path = path.as_ref().to_path_buf();
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No denylist file yet; starting empty");
                String::new()
            }
            Err(source) => return Err(DenylistError::Io { path, source }),
        };

        let domains: HashSet<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        info!(count = domains.len(), "Loaded denylist");

        Ok(Self {
            path: Some(path),
            domains,
        })
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Add `domain` to the set and append it to the backing file, if any.
    ///
    /// The append happens even when the domain is already present; readers
    /// collapse duplicates.
    ///
    /// # Errors
    ///
    /// Fails if the backing file cannot be opened or written.
    #[instrument(level = "info", skip(self))]
    pub async fn record(&mut self, domain: &str) -> Result<(), DenylistError> {
        if let Some(path) = &self.path {
            let io_err = |source| DenylistError::Io {
                path: path.clone(),
                source,
            };
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await
                .map_err(io_err)?;
            file.write_all(format!("{domain}\n").as_bytes())
                .await
                .map_err(io_err)?;
            file.flush().await.map_err(io_err)?;
            debug!(path = %path.display(), "Appended domain to denylist file");
        }

        self.domains.insert(domain.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let denylist = Denylist::load(tmp.path().join("banned_domains.txt"))
            .await
            .unwrap();
        assert!(denylist.is_empty());
    }

    #[tokio::test]
    async fn test_load_trims_and_skips_blank_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("banned_domains.txt");
        tokio::fs::write(&path, "a.example\n\n  b.example  \na.example\n")
            .await
            .unwrap();

        let denylist = Denylist::load(&path).await.unwrap();
        assert_eq!(denylist.len(), 2);
        assert!(denylist.contains("a.example"));
        assert!(denylist.contains("b.example"));
    }

    #[tokio::test]
    async fn test_record_appends_and_survives_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("banned_domains.txt");

        let mut denylist = Denylist::load(&path).await.unwrap();
        denylist.record("short.example").await.unwrap();
        denylist.record("thin.example").await.unwrap();
        assert!(denylist.contains("short.example"));

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(raw, "short.example\nthin.example\n");

        let reloaded = Denylist::load(&path).await.unwrap();
        assert!(reloaded.contains("short.example"));
        assert!(reloaded.contains("thin.example"));
    }

    #[tokio::test]
    async fn test_repeated_record_is_tolerated() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("banned_domains.txt");

        let mut denylist = Denylist::load(&path).await.unwrap();
        denylist.record("dup.example").await.unwrap();
        denylist.record("dup.example").await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert_eq!(Denylist::load(&path).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_into_unwritable_location_fails() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let mut denylist = Denylist {
            path: Some(tmp.path().to_path_buf()),
            domains: HashSet::new(),
        };

        let err = denylist.record("x.example").await.unwrap_err();
        assert!(matches!(err, DenylistError::Io { .. }));
        assert!(!denylist.contains("x.example"));
    }

    #[tokio::test]
    async fn test_in_memory_record() {
        let mut denylist = Denylist::in_memory(["a.example"]);
        denylist.record("b.example").await.unwrap();
        assert!(denylist.contains("a.example"));
        assert!(denylist.contains("b.example"));
    }
}
