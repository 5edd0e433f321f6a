//! Payment catalog gateway.
//!
//! Products created in the studio are mirrored into the payment platform's
//! catalog as an item plus a price. The mirror is best-effort: local state is
//! authoritative and gateway failures never roll anything back.
//!
//! # API Reference
//!
//! - Base URL: `https://api.stripe.com/v1` (configurable)
//! - Authentication: `Authorization: Bearer <secret key>`, per request, since
//!   each tenant may carry its own key
//! - Bodies: `application/x-www-form-urlencoded`

mod error;
mod stripe;

pub use error::CatalogError;
pub use stripe::StripeCatalogClient;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use storeloom_core::{SecretKey, to_minor_units};

use crate::models::{Product, ProductPatch};

/// Maximum description length the catalog accepts from us.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Currency used when the tenant has none configured.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Item to create in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogItem {
    pub name: String,
    pub description: Option<String>,
    /// Absolute `http(s)` image URL.
    pub image: Option<String>,
}

/// Price to attach to a catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogPrice {
    pub item_ref: String,
    /// Amount in minor units (cents).
    pub unit_amount: i64,
    /// Lower-case ISO 4217 code.
    pub currency: String,
}

/// Listing fields to change on an existing item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Account owning a secret key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogAccount {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl CatalogAccount {
    /// Label for messages: email when known, else the account id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.id)
    }
}

/// The payment platform's catalog API.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Create an item, returning its external reference.
    async fn create_item(
        &self,
        key: &SecretKey,
        item: &NewCatalogItem,
    ) -> Result<String, CatalogError>;

    /// Create a price, returning its external reference.
    async fn create_price(
        &self,
        key: &SecretKey,
        price: &NewCatalogPrice,
    ) -> Result<String, CatalogError>;

    /// Change listing fields of an existing item.
    async fn update_item(
        &self,
        key: &SecretKey,
        item_ref: &str,
        update: &CatalogItemUpdate,
    ) -> Result<(), CatalogError>;

    /// Look up the account a key belongs to.
    async fn retrieve_account(&self, key: &SecretKey) -> Result<CatalogAccount, CatalogError>;
}

/// Secret key for a tenant: its own override, else the global key.
///
/// Returns `None` unless the chosen key has the platform's secret prefix.
#[must_use]
pub fn resolve_secret(tenant_key: &SecretKey, global_key: &SecretKey) -> Option<SecretKey> {
    let key = if tenant_key.is_empty() {
        global_key
    } else {
        tenant_key
    };
    key.is_usable().then(|| key.clone())
}

/// Cut a description to [`MAX_DESCRIPTION_CHARS`] characters.
#[must_use]
pub fn truncate_description(description: &str) -> String {
    description.chars().take(MAX_DESCRIPTION_CHARS).collect()
}

fn hosted_image(image: &str) -> Option<String> {
    let url = Url::parse(image).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| image.to_string())
}

impl NewCatalogItem {
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.title.clone(),
            description: (!product.description.is_empty())
                .then(|| truncate_description(&product.description)),
            image: hosted_image(&product.image),
        }
    }
}

impl NewCatalogPrice {
    /// Price for a product in the tenant's currency.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidRequest` if the price does not fit in
    /// minor units.
    pub fn for_product(
        item_ref: &str,
        product: &Product,
        currency: &str,
    ) -> Result<Self, CatalogError> {
        let unit_amount = to_minor_units(product.price).ok_or_else(|| {
            CatalogError::InvalidRequest(format!("price {} out of range", product.price))
        })?;
        let currency = if currency.trim().is_empty() {
            DEFAULT_CURRENCY.to_string()
        } else {
            currency.trim().to_lowercase()
        };
        Ok(Self {
            item_ref: item_ref.to_string(),
            unit_amount,
            currency,
        })
    }
}

impl CatalogItemUpdate {
    /// Listing changes carried by a product patch, if any.
    #[must_use]
    pub fn from_patch(patch: &ProductPatch) -> Option<Self> {
        if !patch.touches_listing() {
            return None;
        }
        Some(Self {
            name: patch.title.clone().filter(|t| !t.is_empty()),
            description: patch
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(truncate_description),
        })
    }
}
