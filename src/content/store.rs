//! File-backed store for the most recently submitted content
//!
//! Holds exactly one string value under [`CONTENT_KEY`]. Writes go through a
//! temporary file and a rename so readers never observe a partial value.

use crate::error::{validate_content, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Key under which the learning content is persisted
pub const CONTENT_KEY: &str = "learning-content";

/// Store for the single current content value
pub struct ContentStore {
    path: PathBuf,
    cached: Arc<RwLock<Option<String>>>,
}

impl ContentStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed
    pub async fn open(base_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(base_dir).await?;
        let path = base_dir.join(format!("{}.txt", CONTENT_KEY));

        let cached = match tokio::fs::read_to_string(&path).await {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), loaded = cached.is_some(), "Content store opened");

        Ok(Self {
            path,
            cached: Arc::new(RwLock::new(cached)),
        })
    }

    /// Path of the persisted value
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the stored content.
    ///
    /// The content must pass the generation length check; the previous value
    /// is left untouched on rejection.
    pub async fn submit(&self, content: &str) -> Result<()> {
        validate_content(content)?;

        let mut cached = self.cached.write().await;
        let tmp = self.path.with_extension("txt.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        *cached = Some(content.to_string());

        tracing::info!(chars = content.chars().count(), "Learning content saved");
        Ok(())
    }

    /// Current content, if any has been submitted
    pub async fn get(&self) -> Option<String> {
        self.cached.read().await.clone()
    }

    /// Remove the stored content
    pub async fn clear(&self) -> Result<()> {
        let mut cached = self.cached.write().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        *cached = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample() -> String {
        "Photosynthesis converts light energy into chemical energy stored in glucose.".to_string()
    }

    #[tokio::test]
    async fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::open(dir.path()).await.unwrap();
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn test_submit_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::open(dir.path()).await.unwrap();

        store.submit(&sample()).await.unwrap();
        assert_eq!(store.get().await.as_deref(), Some(sample().as_str()));
        assert!(store.path().ends_with("learning-content.txt"));
    }

    #[tokio::test]
    async fn test_submit_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::open(dir.path()).await.unwrap();

        store.submit(&sample()).await.unwrap();
        let newer = format!("{} Chlorophyll absorbs mostly blue and red light.", sample());
        store.submit(&newer).await.unwrap();
        assert_eq!(store.get().await, Some(newer));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = ContentStore::open(dir.path()).await.unwrap();
            store.submit(&sample()).await.unwrap();
        }
        let reopened = ContentStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.get().await, Some(sample()));
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::open(dir.path()).await.unwrap();
        store.submit(&sample()).await.unwrap();

        let err = store.submit("too short").await.unwrap_err();
        assert!(matches!(err, Error::ContentTooShort { .. }));
        let err = store.submit("   ").await.unwrap_err();
        assert!(matches!(err, Error::ContentMissing));

        assert_eq!(store.get().await, Some(sample()));
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::open(dir.path()).await.unwrap();
        store.submit(&sample()).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.get().await.is_none());
        assert!(!store.path().exists());

        // Clearing an empty store is a no-op
        store.clear().await.unwrap();
    }
}
