//! Products and their best-effort mirror in the payment catalog.
//!
//! A product is committed locally first. When a usable secret key exists a
//! detached task creates the catalog item and price; its outcome comes back
//! through [`Studio::reconcile_catalog`] as a patch of the two external
//! references on the tenant the product was created in.

use std::sync::Arc;

use tracing::instrument;

use storeloom_core::{ProductId, SecretKey, StoreId};

use crate::catalog::{
    CatalogGateway, CatalogItemUpdate, NewCatalogItem, NewCatalogPrice, resolve_secret,
};
use crate::error::Rejection;
use crate::models::{Product, ProductPatch};
use crate::notifications::NotificationCenter;

use super::Studio;

const SYNCED: &str = "Synced to payment catalog!";
const SYNC_FAILED: &str = "Payment catalog sync failed, created locally only.";

/// External references produced by one catalog sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSyncOutcome {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub item_ref: Option<String>,
    pub price_ref: Option<String>,
}

impl CatalogSyncOutcome {
    /// Both the item and its price exist in the catalog.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.item_ref.is_some() && self.price_ref.is_some()
    }
}

/// Create the item, then its price. Raises exactly one notification.
#[instrument(skip_all, fields(store_id = %store_id, product_id = %product.id))]
async fn mirror_product(
    gateway: Arc<dyn CatalogGateway>,
    notifications: NotificationCenter,
    key: SecretKey,
    store_id: StoreId,
    product: Product,
    currency: String,
) -> CatalogSyncOutcome {
    let mut outcome = CatalogSyncOutcome {
        store_id,
        product_id: product.id.clone(),
        item_ref: None,
        price_ref: None,
    };

    let item_ref = match gateway
        .create_item(&key, &NewCatalogItem::from_product(&product))
        .await
    {
        Ok(item_ref) => item_ref,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog item creation failed");
            notifications.error(SYNC_FAILED);
            return outcome;
        }
    };
    outcome.item_ref = Some(item_ref.clone());

    let price_ref = match NewCatalogPrice::for_product(&item_ref, &product, &currency) {
        Ok(price) => gateway.create_price(&key, &price).await,
        Err(e) => Err(e),
    };
    match price_ref {
        Ok(price_ref) => {
            outcome.price_ref = Some(price_ref);
            notifications.success(SYNCED);
        }
        Err(e) => {
            tracing::warn!(error = %e, item_ref = %item_ref, "Catalog price creation failed");
            notifications.error(SYNC_FAILED);
        }
    }
    outcome
}

impl Studio {
    /// Secret key and currency for catalog calls on behalf of `store_id`.
    fn catalog_credentials(&self, store_id: &StoreId) -> Option<(SecretKey, String)> {
        let store = self.collection.get(store_id)?;
        let key = resolve_secret(
            &store.settings.payment_secret_key,
            &self.collection.platform().secret_key,
        )?;
        Some((key, store.settings.currency.clone()))
    }

    /// Add a product at the head of the active tenant's catalog.
    ///
    /// # Errors
    ///
    /// Returns `Rejection::NoActiveStore` when there is no tenant to add to.
    pub fn add_product(&mut self, product: Product) -> Result<ProductId, Rejection> {
        let Some(store_id) = self.writable_tenant_id() else {
            return Err(self.reject(Rejection::NoActiveStore));
        };
        let product_id = product.id.clone();
        let credentials = self.catalog_credentials(&store_id);

        let mirrored = credentials.is_some().then(|| product.clone());
        self.modify_active_tenant(|store| store.products.insert(0, product));
        self.notifications.success("Product added.");

        if let (Some((key, currency)), Some(product)) = (credentials, mirrored) {
            tracing::debug!(store_id = %store_id, product_id = %product_id, "Queued catalog sync");
            let task = mirror_product(
                self.catalog.clone(),
                self.notifications.clone(),
                key,
                store_id,
                product,
                currency,
            );
            self.catalog_sync.spawn_on(task, &self.runtime);
        }
        Ok(product_id)
    }

    /// Merge a patch into a product.
    ///
    /// When the product is already in the catalog and the patch changes its
    /// title or description, the listing is updated in the background.
    /// Returns `false` when the product does not exist.
    pub fn update_product(&mut self, id: &ProductId, patch: ProductPatch) -> bool {
        let remote = self.writable_tenant_id().and_then(|store_id| {
            let item_ref = self
                .collection
                .get(&store_id)?
                .product(id)?
                .external_product_ref
                .clone()?;
            let (key, _) = self.catalog_credentials(&store_id)?;
            let update = CatalogItemUpdate::from_patch(&patch)?;
            Some((key, item_ref, update))
        });

        let mut found = false;
        self.modify_active_tenant(|store| {
            if let Some(product) = store.product_mut(id) {
                product.apply(patch);
                found = true;
            }
        });
        self.notifications.success("Product updated.");

        if let (true, Some((key, item_ref, update))) = (found, remote) {
            let gateway = self.catalog.clone();
            self.background.spawn_on(
                async move {
                    if let Err(e) = gateway.update_item(&key, &item_ref, &update).await {
                        tracing::error!(error = %e, item_ref = %item_ref, "Catalog item update failed");
                    }
                },
                &self.runtime,
            );
        }
        found
    }

    /// Remove a product locally. The catalog copy is left alone.
    pub fn delete_product(&mut self, id: &ProductId) {
        self.modify_active_tenant(|store| store.products.retain(|p| &p.id != id));
        self.notifications.success("Product deleted.");
    }

    /// Number of catalog syncs not yet applied.
    #[must_use]
    pub fn pending_catalog_sync(&self) -> usize {
        self.catalog_sync.len()
    }

    /// Apply every catalog sync that has finished, without waiting.
    ///
    /// Returns the number of products patched.
    pub fn reconcile_catalog(&mut self) -> usize {
        let mut patched = 0;
        while let Some(result) = self.catalog_sync.try_join_next() {
            match result {
                Ok(outcome) => patched += usize::from(self.apply_sync_outcome(&outcome)),
                Err(e) => tracing::warn!(error = %e, "Catalog sync task failed"),
            }
        }
        while let Some(result) = self.background.try_join_next() {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Background task failed");
            }
        }
        patched
    }

    /// Wait for every pending catalog sync and apply it.
    ///
    /// Returns the number of products patched.
    pub async fn settle_catalog_sync(&mut self) -> usize {
        let mut patched = 0;
        while let Some(result) = self.catalog_sync.join_next().await {
            match result {
                Ok(outcome) => patched += usize::from(self.apply_sync_outcome(&outcome)),
                Err(e) => tracing::warn!(error = %e, "Catalog sync task failed"),
            }
        }
        patched
    }

    /// Patch only the external references of the synced product.
    fn apply_sync_outcome(&mut self, outcome: &CatalogSyncOutcome) -> bool {
        if outcome.item_ref.is_none() {
            return false;
        }
        let mut patched = false;
        self.collection.update_tenant(&outcome.store_id, |mut store| {
            if let Some(product) = store.product_mut(&outcome.product_id) {
                product.external_product_ref.clone_from(&outcome.item_ref);
                if outcome.price_ref.is_some() {
                    product.external_price_ref.clone_from(&outcome.price_ref);
                }
                patched = true;
            }
            store
        });

        if patched {
            self.persist_tenants();
        } else {
            tracing::debug!(
                store_id = %outcome.store_id,
                product_id = %outcome.product_id,
                "Synced product no longer exists"
            );
        }
        patched
    }
}
