//! File snapshot backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{PersistenceError, SnapshotStore};

/// One `<key>.json` file per snapshot under a data directory.
///
/// Each save writes a sibling temp file and renames it over the target, so
/// readers see either the previous snapshot or the new one, never a mix.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Use `dir`, creating it on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let target = self.path_for(key);
        let staging = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&staging, value).await?;
        tokio::fs::rename(&staging, &target).await?;

        tracing::trace!(path = %target.display(), bytes = value.len(), "Snapshot written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        assert_eq!(store.load("storeloom.stores").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested"));

        store.save("storeloom.active_id", "\"first-long-id\"").await.unwrap();
        store.save("storeloom.active_id", "\"b\"").await.unwrap();

        assert_eq!(
            store.load("storeloom.active_id").await.unwrap().as_deref(),
            Some("\"b\"")
        );
        assert!(!dir.path().join("nested/storeloom.active_id.json.tmp").exists());
    }
}
