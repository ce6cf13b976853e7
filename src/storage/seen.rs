//! Seen-set storage.
//!
//! The seen-set is the full memory of the watcher: an ordered list of
//! fingerprints of every ad that has been notified. It is persisted as a
//! JSON string array so the file stays hand-inspectable and compatible with
//! earlier incarnations of the tool.
//!
//! The set only ever grows. That is fine for a bounded listing feed; expiry
//! would buy nothing but the chance to re-notify an old ad.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Ordered set of previously-notified fingerprints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    fingerprints: Vec<String>,
}

impl SeenSet {
    /// Create an empty seen-set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a seen-set from an existing fingerprint sequence.
    pub fn from_fingerprints(fingerprints: Vec<String>) -> Self {
        Self { fingerprints }
    }

    /// Whether the fingerprint has been notified before.
    pub fn contains(&self, fingerprint: &str) -> bool {
        self.fingerprints.iter().any(|f| f == fingerprint)
    }

    /// Append a fingerprint unless already present. Insertion order is
    /// preserved. Returns true when the fingerprint was new.
    pub fn insert(&mut self, fingerprint: impl Into<String>) -> bool {
        let fingerprint = fingerprint.into();
        if self.contains(&fingerprint) {
            return false;
        }
        self.fingerprints.push(fingerprint);
        true
    }

    /// Fingerprints in insertion order.
    pub fn fingerprints(&self) -> &[String] {
        &self.fingerprints
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}

/// Filesystem store for the seen-set.
#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted seen-set.
    ///
    /// A missing file is not an error: the first run starts with an empty
    /// set. Any other I/O or parse failure is fatal.
    pub async fn load(&self) -> Result<SeenSet> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let fingerprints: Vec<String> = serde_json::from_slice(&bytes)?;
                Ok(SeenSet::from_fingerprints(fingerprints))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No seen-set at {}, starting with an empty one",
                    self.path.display()
                );
                Ok(SeenSet::new())
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Persist the full seen-set, replacing prior contents.
    ///
    /// Writes to a temp file and renames over the target so a crash cannot
    /// leave a truncated set behind.
    pub async fn save(&self, seen: &SeenSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec(&seen.fingerprints)?;
        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
