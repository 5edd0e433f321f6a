//! The studio: every mutation of the tenant collection.
//!
//! All writes go through [`Studio::update_active_tenant`], which replaces the
//! tenant whose id equals the active id and then queues a snapshot of the
//! tenant list. Operations are grouped by concern:
//!
//! - `tenants` - create, switch, platform credentials
//! - `branding` - settings, brand identity, AI brand assists
//! - `marketing` - stats, campaigns, reviews, discounts
//! - `arena` - the growth arena duel
//! - `catalog` - products and payment catalog mirroring
//! - `cart` / `orders` - shopping cart and checkout
//! - `sections` - page layout blocks

mod arena;
mod branding;
mod cart;
mod catalog;
mod marketing;
mod orders;
mod sections;
mod tenants;

pub use arena::DuelOutcome;
pub use catalog::CatalogSyncOutcome;

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::runtime::Handle;
use tokio::task::JoinSet;

use storeloom_core::StoreId;

use crate::ai::{ContentGenerator, DisabledGenerator, GeminiClient};
use crate::catalog::{CatalogGateway, StripeCatalogClient};
use crate::collection::TenantCollection;
use crate::config::{CatalogConfig, StudioConfig};
use crate::error::{Rejection, StudioError};
use crate::models::{
    BrandIdentity, CartItem, CustomerReview, Discount, LiveActivity, MarketingCampaign,
    MarketingStats, Order, Product, ProfileSection, SalesData, Store, StoreSettings,
};
use crate::notifications::{DEFAULT_TTL, NotificationCenter};
use crate::persistence::{
    FileSnapshotStore, MemorySnapshotStore, SnapshotKey, SnapshotStore, SnapshotWriter,
    load_collection,
};

/// What reads see when no tenant exists.
static EMPTY_STORE: LazyLock<Store> = LazyLock::new(|| Store {
    sections: ProfileSection::defaults(),
    ..Store::default()
});

/// The tenant state layer.
///
/// Mutations take `&mut self` and are synchronous. Catalog sync, snapshot
/// writes and notification expiry run detached on the runtime captured at
/// build time.
pub struct Studio {
    collection: TenantCollection,
    cart: Vec<CartItem>,
    cart_open: bool,
    notifications: NotificationCenter,
    writer: SnapshotWriter,
    catalog: Arc<dyn CatalogGateway>,
    generator: Arc<dyn ContentGenerator>,
    runtime: Handle,
    catalog_sync: JoinSet<CatalogSyncOutcome>,
    background: JoinSet<()>,
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("tenants", &self.collection.tenants().len())
            .field("active_id", &self.collection.active_id())
            .field("cart_lines", &self.cart.len())
            .field("pending_sync", &self.catalog_sync.len())
            .finish_non_exhaustive()
    }
}

/// Assembles a [`Studio`] from its collaborators.
pub struct StudioBuilder {
    collection: TenantCollection,
    snapshots: Option<Arc<dyn SnapshotStore>>,
    catalog: Option<Arc<dyn CatalogGateway>>,
    generator: Option<Arc<dyn ContentGenerator>>,
    notification_ttl: Duration,
    runtime: Option<Handle>,
}

impl Default for StudioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            collection: TenantCollection::default(),
            snapshots: None,
            catalog: None,
            generator: None,
            notification_ttl: DEFAULT_TTL,
            runtime: None,
        }
    }

    /// Start from an already loaded collection.
    #[must_use]
    pub fn collection(mut self, collection: TenantCollection) -> Self {
        self.collection = collection;
        self
    }

    /// Backend receiving snapshots. Defaults to an in-memory store.
    #[must_use]
    pub fn snapshots(mut self, snapshots: Arc<dyn SnapshotStore>) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    /// Payment catalog gateway. Defaults to the public Stripe API.
    #[must_use]
    pub fn catalog(mut self, catalog: Arc<dyn CatalogGateway>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// AI collaborator. Defaults to [`DisabledGenerator`].
    #[must_use]
    pub fn generator(mut self, generator: Arc<dyn ContentGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    #[must_use]
    pub const fn notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    /// Runtime for detached work. Defaults to the current runtime.
    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Build the studio.
    ///
    /// # Errors
    ///
    /// Returns `StudioError::Runtime` when no runtime was given and none is
    /// current, or `StudioError::Catalog` if the default catalog client
    /// fails to build.
    pub fn build(self) -> Result<Studio, StudioError> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current()?,
        };
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(StripeCatalogClient::new(&CatalogConfig::default())?),
        };
        let snapshots = self
            .snapshots
            .unwrap_or_else(|| Arc::new(MemorySnapshotStore::new()));

        Ok(Studio {
            collection: self.collection,
            cart: Vec::new(),
            cart_open: false,
            notifications: NotificationCenter::new(runtime.clone(), self.notification_ttl),
            writer: SnapshotWriter::spawn(&runtime, snapshots),
            catalog,
            generator: self
                .generator
                .unwrap_or_else(|| Arc::new(DisabledGenerator)),
            runtime,
            catalog_sync: JoinSet::new(),
            background: JoinSet::new(),
        })
    }
}

impl Studio {
    #[must_use]
    pub fn builder() -> StudioBuilder {
        StudioBuilder::new()
    }

    /// Open a studio from configuration, loading the persisted collection.
    ///
    /// Uses Postgres when a database URL is configured and the `postgres`
    /// feature is enabled, otherwise one file per snapshot under the data
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a client cannot be built or the database is
    /// unreachable.
    pub async fn open(config: &StudioConfig) -> Result<Self, StudioError> {
        let snapshots = open_snapshots(config).await?;
        let collection = load_collection(snapshots.as_ref()).await;

        let generator: Arc<dyn ContentGenerator> = match &config.gemini {
            Some(gemini) => Arc::new(GeminiClient::new(gemini)?),
            None => {
                tracing::info!("GEMINI_API_KEY not set, AI features disabled");
                Arc::new(DisabledGenerator)
            }
        };

        tracing::info!(
            tenants = collection.tenants().len(),
            catalog_api = %config.catalog.api_base,
            "Studio opened"
        );

        Studio::builder()
            .collection(collection)
            .snapshots(snapshots)
            .catalog(Arc::new(StripeCatalogClient::new(&config.catalog)?))
            .generator(generator)
            .notification_ttl(config.notification_ttl)
            .build()
    }

    // =========================================================================
    // Views
    // =========================================================================

    #[must_use]
    pub const fn collection(&self) -> &TenantCollection {
        &self.collection
    }

    /// All tenants in creation order.
    #[must_use]
    pub fn tenants(&self) -> &[Store] {
        self.collection.tenants()
    }

    /// The tenant reads go to, if any.
    #[must_use]
    pub fn active_tenant(&self) -> Option<&Store> {
        self.collection.active()
    }

    fn view(&self) -> &Store {
        self.collection.active().unwrap_or(&EMPTY_STORE)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.view().products
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.view().orders
    }

    #[must_use]
    pub fn settings(&self) -> &StoreSettings {
        &self.view().settings
    }

    #[must_use]
    pub fn sections(&self) -> &[ProfileSection] {
        &self.view().sections
    }

    #[must_use]
    pub fn sales_data(&self) -> &[SalesData] {
        &self.view().sales_data
    }

    /// Newest first.
    #[must_use]
    pub fn live_feed(&self) -> &[LiveActivity] {
        self.view().live_feed.as_slice()
    }

    #[must_use]
    pub fn brand_identity(&self) -> &BrandIdentity {
        &self.view().brand_identity
    }

    #[must_use]
    pub fn campaigns(&self) -> &[MarketingCampaign] {
        &self.view().campaigns
    }

    #[must_use]
    pub fn reviews(&self) -> &[CustomerReview] {
        &self.view().reviews
    }

    #[must_use]
    pub fn marketing_stats(&self) -> &MarketingStats {
        &self.view().marketing_stats
    }

    #[must_use]
    pub fn discounts(&self) -> &[Discount] {
        &self.view().discounts
    }

    #[must_use]
    pub fn payout_balance(&self) -> Decimal {
        self.view().payout_balance
    }

    #[must_use]
    pub const fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    // =========================================================================
    // Mutation primitive
    // =========================================================================

    /// Replace the active tenant with `transform(active)`.
    ///
    /// No-op returning `false` when the active id matches no tenant. On
    /// success the tenant list is persisted.
    pub fn update_active_tenant<F>(&mut self, transform: F) -> bool
    where
        F: FnOnce(Store) -> Store,
    {
        let changed = self.collection.update_active(transform);
        if changed {
            self.persist_tenants();
        } else {
            tracing::debug!("No active tenant to update");
        }
        changed
    }

    /// In-place flavour of [`Studio::update_active_tenant`].
    fn modify_active_tenant<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut Store),
    {
        self.update_active_tenant(|mut store| {
            edit(&mut store);
            store
        })
    }

    /// Active tenant id, only when it names an existing tenant.
    ///
    /// Reads fall back to the first tenant; writes never do.
    fn writable_tenant_id(&self) -> Option<StoreId> {
        self.collection
            .active_id()
            .filter(|id| self.collection.contains(id))
            .cloned()
    }

    /// Surface a rejection as an error notification and hand it back.
    fn reject(&self, rejection: Rejection) -> Rejection {
        self.notifications.error(rejection.to_string());
        rejection
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn persist_tenants(&self) {
        self.writer
            .save(SnapshotKey::Stores, self.collection.tenants());
    }

    fn persist_active_id(&self) {
        self.writer
            .save(SnapshotKey::ActiveId, &self.collection.active_id());
    }

    fn persist_platform(&self) {
        self.writer
            .save(SnapshotKey::PlatformCredentials, self.collection.platform());
    }

    /// Wait for every queued snapshot write.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Settle catalog sync and background work, then flush snapshots.
    pub async fn shutdown(&mut self) {
        self.settle_catalog_sync().await;
        while let Some(result) = self.background.join_next().await {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Background task failed");
            }
        }
        self.flush().await;
        tracing::info!("Studio shut down");
    }
}

#[cfg(feature = "postgres")]
async fn open_snapshots(config: &StudioConfig) -> Result<Arc<dyn SnapshotStore>, StudioError> {
    if let Some(url) = &config.database_url {
        let store = crate::persistence::PgSnapshotStore::connect(url).await?;
        store.migrate().await?;
        tracing::info!("Using Postgres snapshot store");
        return Ok(Arc::new(store));
    }
    Ok(file_snapshots(config))
}

#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
async fn open_snapshots(config: &StudioConfig) -> Result<Arc<dyn SnapshotStore>, StudioError> {
    if config.database_url.is_some() {
        tracing::warn!("STOREFRONT_DATABASE_URL set but postgres support is not compiled in");
    }
    Ok(file_snapshots(config))
}

fn file_snapshots(config: &StudioConfig) -> Arc<dyn SnapshotStore> {
    tracing::info!(dir = %config.data_dir.display(), "Using file snapshot store");
    Arc::new(FileSnapshotStore::new(config.data_dir.clone()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use storeloom_core::{NotificationKind, SecretKey};

    use crate::catalog::{
        CatalogAccount, CatalogError, CatalogGateway, CatalogItemUpdate, NewCatalogItem,
        NewCatalogPrice,
    };
    use crate::persistence::MemorySnapshotStore;

    use super::{Studio, StudioBuilder};

    /// Gateway that answers from a script and records every call.
    #[derive(Default)]
    pub struct ScriptedCatalog {
        pub fail_item: bool,
        pub fail_price: bool,
        pub calls: Mutex<Vec<String>>,
    }

    impl ScriptedCatalog {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        fn record(&self, call: String) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call);
            }
        }
    }

    #[async_trait]
    impl CatalogGateway for ScriptedCatalog {
        async fn create_item(
            &self,
            _key: &SecretKey,
            item: &NewCatalogItem,
        ) -> Result<String, CatalogError> {
            self.record(format!("item:{}", item.name));
            if self.fail_item {
                return Err(CatalogError::Unauthorized);
            }
            Ok("prod_test".to_string())
        }

        async fn create_price(
            &self,
            _key: &SecretKey,
            price: &NewCatalogPrice,
        ) -> Result<String, CatalogError> {
            self.record(format!("price:{}:{}", price.unit_amount, price.currency));
            if self.fail_price {
                return Err(CatalogError::Api {
                    status: 400,
                    message: "bad price".to_string(),
                });
            }
            Ok("price_test".to_string())
        }

        async fn update_item(
            &self,
            _key: &SecretKey,
            item_ref: &str,
            update: &CatalogItemUpdate,
        ) -> Result<(), CatalogError> {
            self.record(format!(
                "update:{item_ref}:{}",
                update.name.as_deref().unwrap_or_default()
            ));
            Ok(())
        }

        async fn retrieve_account(&self, key: &SecretKey) -> Result<CatalogAccount, CatalogError> {
            self.record("account".to_string());
            if key.expose() == "sk_revoked" {
                return Err(CatalogError::Unauthorized);
            }
            Ok(CatalogAccount {
                id: "acct_123".to_string(),
                email: Some("owner@example.com".to_string()),
            })
        }
    }

    pub fn builder(catalog: Arc<ScriptedCatalog>) -> StudioBuilder {
        Studio::builder()
            .snapshots(Arc::new(MemorySnapshotStore::new()))
            .catalog(catalog)
    }

    pub fn studio() -> Studio {
        builder(Arc::new(ScriptedCatalog::default()))
            .build()
            .unwrap_or_else(|e| panic!("build studio: {e}"))
    }

    pub fn messages(studio: &Studio, kind: NotificationKind) -> Vec<String> {
        studio.notifications().messages(kind)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::test_support::studio;
    use super::*;

    #[tokio::test]
    async fn test_views_fall_back_without_tenant() {
        let studio = studio();
        assert!(studio.products().is_empty());
        assert_eq!(studio.settings().name, "My Brand");
        assert_eq!(studio.sections().len(), 2);
        assert_eq!(studio.marketing_stats().ad_credits, 1000);
        assert_eq!(studio.payout_balance(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_update_without_tenant_is_noop() {
        let mut studio = studio();
        assert!(!studio.update_active_tenant(|s| s));
    }

    #[tokio::test]
    async fn test_update_persists_tenant_list() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let mut studio = Studio::builder()
            .snapshots(snapshots.clone())
            .catalog(Arc::new(super::test_support::ScriptedCatalog::default()))
            .build()
            .unwrap();
        studio.create_tenant("Nova", "Tech");
        assert!(studio.modify_active_tenant(|s| s.payout_balance = Decimal::TEN));
        studio.flush().await;

        let saved: Vec<Store> =
            serde_json::from_str(&snapshots.get("storeloom.stores").unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].payout_balance, Decimal::TEN);
        assert!(snapshots.get("storeloom.active_id").is_some());
    }

    #[test]
    fn test_build_outside_runtime_fails() {
        let result = Studio::builder()
            .catalog(Arc::new(super::test_support::ScriptedCatalog::default()))
            .build();
        assert!(matches!(result, Err(StudioError::Runtime(_))));
    }
}
