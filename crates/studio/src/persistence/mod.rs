//! Snapshot persistence for the tenant collection.
//!
//! The collection is stored as three independent snapshots, each a JSON
//! document under its own key:
//!
//! - `storeloom.stores` - every tenant
//! - `storeloom.active_id` - the active tenant id (or `null`)
//! - `storeloom.platform_credentials` - global payment keys
//!
//! Writes are full snapshots of one slice, queued to a single background
//! [`SnapshotWriter`] so they land in the order the changes happened.
//! Loading never fails: a missing or unreadable snapshot falls back to its
//! empty default.
//!
//! # Backends
//!
//! - [`MemorySnapshotStore`] - in-process, for tests and ephemeral sessions
//! - [`FileSnapshotStore`] - one file per key in a data directory
//! - `PgSnapshotStore` - `studio.snapshots` table (feature `postgres`)

mod file;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;
mod writer;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use storeloom_core::StoreId;

use crate::collection::{PlatformCredentials, TenantCollection};
use crate::models::Store;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;
#[cfg(feature = "postgres")]
pub use postgres::PgSnapshotStore;
pub use writer::SnapshotWriter;

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem error from the file backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error from the Postgres backend.
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error from the Postgres backend.
    #[cfg(feature = "postgres")]
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Snapshot could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The three named snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    Stores,
    ActiveId,
    PlatformCredentials,
}

impl SnapshotKey {
    pub const ALL: [Self; 3] = [Self::Stores, Self::ActiveId, Self::PlatformCredentials];

    /// Key under which the backend stores this snapshot.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Stores => "storeloom.stores",
            Self::ActiveId => "storeloom.active_id",
            Self::PlatformCredentials => "storeloom.platform_credentials",
        }
    }
}

impl std::fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// Key-value backend holding whole snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read a snapshot, `None` if it was never written.
    async fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace a snapshot.
    async fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Load the collection, defaulting each unreadable snapshot.
pub async fn load_collection(store: &dyn SnapshotStore) -> TenantCollection {
    let tenants: Vec<Store> = load_or_default(store, SnapshotKey::Stores).await;
    let active_id: Option<StoreId> = load_or_default(store, SnapshotKey::ActiveId).await;
    let platform: PlatformCredentials =
        load_or_default(store, SnapshotKey::PlatformCredentials).await;

    tracing::debug!(
        tenants = tenants.len(),
        active_id = ?active_id,
        "Loaded tenant collection"
    );

    TenantCollection::new(tenants, active_id, platform)
}

async fn load_or_default<T>(store: &dyn SnapshotStore, key: SnapshotKey) -> T
where
    T: DeserializeOwned + Default,
{
    match store.load(key.storage_key()).await {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(snapshot = %key, error = %e, "Corrupt snapshot, using default");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(snapshot = %key, error = %e, "Failed to read snapshot, using default");
            T::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_backend_loads_defaults() {
        let store = MemorySnapshotStore::new();
        let collection = load_collection(&store).await;
        assert!(collection.tenants().is_empty());
        assert!(collection.active_id().is_none());
        assert_eq!(collection.platform(), &PlatformCredentials::default());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_only_defaults_itself() {
        let store = MemorySnapshotStore::new();
        store
            .save(SnapshotKey::Stores.storage_key(), "{not json")
            .await
            .unwrap();
        store
            .save(SnapshotKey::ActiveId.storage_key(), "\"k3j9x0a2b\"")
            .await
            .unwrap();

        let collection = load_collection(&store).await;
        assert!(collection.tenants().is_empty());
        assert_eq!(collection.active_id(), Some(&StoreId::new("k3j9x0a2b")));
    }

    #[test]
    fn test_storage_keys() {
        let keys: Vec<&str> = SnapshotKey::ALL.iter().map(|k| k.storage_key()).collect();
        assert_eq!(
            keys,
            [
                "storeloom.stores",
                "storeloom.active_id",
                "storeloom.platform_credentials"
            ]
        );
    }
}
