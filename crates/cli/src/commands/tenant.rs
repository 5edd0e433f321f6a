//! Tenant and payment platform commands.
//!
//! # Usage
//!
//! ```bash
//! storeloom tenant create "Nova Goods" Tech
//! storeloom tenant switch 8h2kd0q
//! storeloom tenant list
//! storeloom platform connect pk_live_123 sk_live_456
//! ```

use storeloom_core::{SecretKey, StoreId};
use storeloom_studio::StudioConfig;

use super::{CommandError, open};

/// Create a tenant and make it active.
pub async fn create(config: &StudioConfig, name: &str, category: &str) -> Result<(), CommandError> {
    let mut studio = open(config).await?;
    let id = studio.create_tenant(name, category);
    tracing::info!(store_id = %id, "Tenant created");
    studio.shutdown().await;
    Ok(())
}

/// Make another tenant active.
pub async fn switch(config: &StudioConfig, id: &str) -> Result<(), CommandError> {
    let mut studio = open(config).await?;
    let switched = studio.switch_tenant(&StoreId::new(id));
    studio.shutdown().await;
    if switched {
        Ok(())
    } else {
        Err(CommandError::not_found("Tenant", id))
    }
}

/// List tenants, marking the active one.
pub async fn list(config: &StudioConfig) -> Result<(), CommandError> {
    let studio = open(config).await?;
    let active = studio.collection().active_id().cloned();

    if studio.tenants().is_empty() {
        tracing::info!("No tenants yet. Create one with `storeloom tenant create <name>`");
    }
    for store in studio.tenants() {
        let marker = if active.as_ref() == Some(&store.id) { "*" } else { " " };
        tracing::info!(
            "{marker} {}  {} ({}) - {} products, {} orders",
            store.id,
            store.name(),
            store.settings.category,
            store.products.len(),
            store.orders.len()
        );
    }
    Ok(())
}

/// Validate a secret key against the payment platform and store both keys.
pub async fn connect(
    config: &StudioConfig,
    public_key: &str,
    secret_key: String,
) -> Result<(), CommandError> {
    let mut studio = open(config).await?;
    let result = studio
        .connect_platform(public_key, SecretKey::new(secret_key))
        .await;
    studio.shutdown().await;

    let account = result?;
    tracing::info!(account_id = %account.id, "Payment platform connected");
    Ok(())
}
