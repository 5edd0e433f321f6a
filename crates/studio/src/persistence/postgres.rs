//! `PostgreSQL` snapshot backend.
//!
//! # Tables
//!
//! - `studio.snapshots` - one JSONB document per snapshot key
//!
//! # Migrations
//!
//! Migrations are stored in `crates/studio/migrations/` and run via:
//! ```bash
//! cargo run -p storeloom-cli --features postgres -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{PersistenceError, SnapshotStore};

/// Snapshot backend over a `studio.snapshots` table.
#[derive(Debug, Clone)]
pub struct PgSnapshotStore {
    pool: PgPool,
}

impl PgSnapshotStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a small pool.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Database` if the connection cannot be established.
    pub async fn connect(database_url: &SecretString) -> Result<Self, PersistenceError> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url.expose_secret())
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Migration` if a migration fails.
    pub async fn migrate(&self) -> Result<(), PersistenceError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let value: Option<String> = sqlx::query_scalar(
            r"
            SELECT value::text FROM studio.snapshots
            WHERE key = $1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        sqlx::query(
            r"
            INSERT INTO studio.snapshots (key, value)
            VALUES ($1, $2::jsonb)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
