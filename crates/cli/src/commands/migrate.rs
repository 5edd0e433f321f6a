//! Snapshot table migrations.
//!
//! # Usage
//!
//! ```bash
//! STOREFRONT_DATABASE_URL=postgres://... storeloom migrate
//! ```
//!
//! `Studio::open` also migrates on connect; this command lets deploys run
//! migrations ahead of the first command.

use storeloom_studio::StudioConfig;

use super::CommandError;

#[cfg(feature = "postgres")]
pub async fn run(config: &StudioConfig) -> Result<(), CommandError> {
    use storeloom_studio::persistence::PgSnapshotStore;

    let database_url = config
        .database_url
        .as_ref()
        .ok_or(CommandError::Unavailable("STOREFRONT_DATABASE_URL is not set"))?;

    tracing::info!("Connecting to snapshot database...");
    let store = PgSnapshotStore::connect(database_url).await?;

    tracing::info!("Running snapshot migrations...");
    store.migrate().await?;

    tracing::info!("Snapshot migrations complete!");
    Ok(())
}

#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn run(_config: &StudioConfig) -> Result<(), CommandError> {
    Err(CommandError::Unavailable(
        "storeloom was built without the `postgres` feature",
    ))
}
