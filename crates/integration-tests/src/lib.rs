//! Behavioural tests for Storeloom.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storeloom-integration-tests
//! ```
//!
//! No network or database is needed: the payment catalog and the content
//! generator are replaced by the in-process fakes below, and snapshots go to
//! memory or a temporary directory.
//!
//! # Test Files
//!
//! - `tenants` - isolation, active-tenant replace, platform credentials
//! - `checkout` - cart merge, stock limits, order arithmetic, live feed cap
//! - `catalog_sync` - best-effort mirroring into the payment catalog
//! - `branding` - brand deep merge, level-up boundary, growth arena
//! - `sections` - block reordering and content merges
//! - `persistence` - snapshot round trips and notification expiry

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use storeloom_core::{ProductId, ProductType, SecretKey};
use storeloom_studio::ai::{
    BrandStrategy, ChatTurn, ContentGenerator, DuelOption, DuelScenario, ProductSuggestion,
    SocialPost,
};
use storeloom_studio::catalog::{
    CatalogAccount, CatalogError, CatalogGateway, CatalogItemUpdate, NewCatalogItem,
    NewCatalogPrice,
};
use storeloom_studio::models::{BrandIdentity, Customer, Product, SalesData};
use storeloom_studio::persistence::MemorySnapshotStore;
use storeloom_studio::{Studio, StudioBuilder};

/// Secret key accepted by [`FakeCatalog`].
pub const TEST_SECRET: &str = "sk_test_storeloom";

// =============================================================================
// Payment catalog fake
// =============================================================================

/// How [`FakeCatalog`] answers item and price creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogMode {
    #[default]
    Accept,
    RejectItems,
    RejectPrices,
}

/// In-process payment catalog. Hands out sequential references.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    mode: CatalogMode,
    items: AtomicUsize,
    prices: AtomicUsize,
    updates: Mutex<Vec<(String, CatalogItemUpdate)>>,
}

impl FakeCatalog {
    #[must_use]
    pub fn new(mode: CatalogMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            ..Self::default()
        })
    }

    /// Item creation attempts, successful or not.
    pub fn item_calls(&self) -> usize {
        self.items.load(Ordering::SeqCst)
    }

    /// Price creation attempts, successful or not.
    pub fn price_calls(&self) -> usize {
        self.prices.load(Ordering::SeqCst)
    }

    /// Listing updates received, oldest first.
    pub fn updates(&self) -> Vec<(String, CatalogItemUpdate)> {
        self.updates.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CatalogGateway for FakeCatalog {
    async fn create_item(
        &self,
        _key: &SecretKey,
        _item: &NewCatalogItem,
    ) -> Result<String, CatalogError> {
        let n = self.items.fetch_add(1, Ordering::SeqCst) + 1;
        if self.mode == CatalogMode::RejectItems {
            return Err(CatalogError::Api {
                status: 500,
                message: "catalog unavailable".to_string(),
            });
        }
        Ok(format!("prod_{n}"))
    }

    async fn create_price(
        &self,
        _key: &SecretKey,
        _price: &NewCatalogPrice,
    ) -> Result<String, CatalogError> {
        let n = self.prices.fetch_add(1, Ordering::SeqCst) + 1;
        if self.mode == CatalogMode::RejectPrices {
            return Err(CatalogError::Api {
                status: 400,
                message: "invalid currency".to_string(),
            });
        }
        Ok(format!("price_{n}"))
    }

    async fn update_item(
        &self,
        _key: &SecretKey,
        item_ref: &str,
        update: &CatalogItemUpdate,
    ) -> Result<(), CatalogError> {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push((item_ref.to_string(), update.clone()));
        }
        Ok(())
    }

    async fn retrieve_account(&self, key: &SecretKey) -> Result<CatalogAccount, CatalogError> {
        if key.expose() != TEST_SECRET {
            return Err(CatalogError::Unauthorized);
        }
        Ok(CatalogAccount {
            id: "acct_fake".to_string(),
            email: None,
        })
    }
}

// =============================================================================
// Content generator fake
// =============================================================================

/// Generator with fixed answers. Every duel is won by option B at 1.8x.
#[derive(Debug, Default)]
pub struct CannedGenerator;

impl CannedGenerator {
    #[must_use]
    pub fn scenario() -> DuelScenario {
        DuelScenario {
            product_name: "Aero Bottle".to_string(),
            product_context: "Insulated bottle for commuters".to_string(),
            option_a: "Stay cold all day".to_string(),
            option_b: "Your desk deserves better".to_string(),
            winner: DuelOption::B,
            reason: "Identity beats features".to_string(),
            odds: Decimal::new(18, 1),
        }
    }
}

#[async_trait]
impl ContentGenerator for CannedGenerator {
    async fn product_details(&self, name: &str, _category: &str) -> Option<ProductSuggestion> {
        Some(ProductSuggestion {
            description: format!("{name}, made to last."),
            price: Decimal::from(29),
            tags: vec!["new".to_string()],
            marketing_hook: "Built for every day".to_string(),
        })
    }

    async fn brand_strategy(&self, store_name: &str, category: &str) -> Option<BrandStrategy> {
        Some(BrandStrategy {
            mission: format!("{store_name} makes {category} simple."),
            vision: "Simple everywhere.".to_string(),
            values: vec!["Clarity".to_string(), "Care".to_string()],
            tone_of_voice: "Warm".to_string(),
        })
    }

    async fn duel_scenario(&self, _category: &str) -> Option<DuelScenario> {
        Some(Self::scenario())
    }

    async fn brand_persona_reply(
        &self,
        message: &str,
        history: &[ChatTurn],
        _identity: &BrandIdentity,
        store_name: &str,
    ) -> String {
        format!("{store_name} hears you ({} earlier): {message}", history.len())
    }

    async fn social_post(
        &self,
        product: &Product,
        platform: &str,
        _identity: &BrandIdentity,
    ) -> Option<SocialPost> {
        Some(SocialPost {
            caption: format!("Meet {} on {platform}", product.title),
            hashtags: vec!["#new".to_string()],
            visual_description: "Flat lay".to_string(),
            estimated_reach: "1k".to_string(),
            best_time: "9am".to_string(),
        })
    }

    async fn sales_insight(&self, data: &[SalesData]) -> String {
        format!("{} days analysed", data.len())
    }

    async fn store_concept(&self, topic: &str) -> Option<String> {
        Some(format!("{topic}, reimagined"))
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Studio over memory snapshots with the given catalog and canned AI.
#[must_use]
pub fn builder(catalog: Arc<FakeCatalog>) -> StudioBuilder {
    Studio::builder()
        .snapshots(Arc::new(MemorySnapshotStore::new()))
        .catalog(catalog)
        .generator(Arc::new(CannedGenerator))
}

/// Studio with an accepting catalog.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime.
#[must_use]
pub fn studio() -> Studio {
    builder(FakeCatalog::new(CatalogMode::Accept))
        .build()
        .unwrap_or_else(|e| panic!("build studio: {e}"))
}

/// A stock-tracked product.
#[must_use]
pub fn product(id: &str, price: i64, cost: i64, inventory: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: id.to_string(),
        price: Decimal::from(price),
        cost_per_item: Decimal::from(cost),
        inventory,
        product_type: ProductType::Physical,
        ..Product::default()
    }
}

/// A customer that passes checkout validation.
#[must_use]
pub fn customer() -> Customer {
    Customer {
        name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        address: "1 Compiler Lane".to_string(),
        city: "Arlington".to_string(),
        zip: "22201".to_string(),
        country: "USA".to_string(),
    }
}
