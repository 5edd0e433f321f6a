//! Product commands for the active tenant.
//!
//! Adding a product mirrors it into the payment catalog when a secret key is
//! configured; the command waits for that sync before exiting.

use rust_decimal::Decimal;

use storeloom_core::{ProductId, ProductType};
use storeloom_studio::StudioConfig;
use storeloom_studio::models::{Product, ProductPatch};

use super::{CommandError, open};

/// Fields accepted by `product add`.
#[derive(Debug)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub cost: Decimal,
    pub inventory: i64,
    pub product_type: ProductType,
}

impl Draft {
    fn into_product(self) -> Product {
        Product {
            id: ProductId::new(storeloom_studio::ids::short_token()),
            title: self.title,
            description: self.description,
            category: self.category,
            price: self.price,
            cost_per_item: self.cost,
            inventory: self.inventory,
            product_type: self.product_type,
            ..Product::default()
        }
    }
}

pub async fn add(config: &StudioConfig, draft: Draft) -> Result<(), CommandError> {
    let mut studio = open(config).await?;
    let result = studio.add_product(draft.into_product());
    studio.shutdown().await;

    let id = result?;
    tracing::info!(product_id = %id, "Product added");
    Ok(())
}

pub async fn update(
    config: &StudioConfig,
    id: &str,
    patch: ProductPatch,
) -> Result<(), CommandError> {
    let mut studio = open(config).await?;
    let updated = studio.update_product(&ProductId::new(id), patch);
    studio.shutdown().await;
    if updated {
        Ok(())
    } else {
        Err(CommandError::not_found("Product", id))
    }
}

pub async fn delete(config: &StudioConfig, id: &str) -> Result<(), CommandError> {
    let mut studio = open(config).await?;
    let id = ProductId::new(id);
    let exists = studio.products().iter().any(|p| p.id == id);
    studio.delete_product(&id);
    studio.shutdown().await;
    if exists {
        Ok(())
    } else {
        Err(CommandError::not_found("Product", id.as_str()))
    }
}

pub async fn list(config: &StudioConfig) -> Result<(), CommandError> {
    let studio = open(config).await?;
    for product in studio.products() {
        let synced = if product.external_product_ref.is_some() {
            "synced"
        } else {
            "local"
        };
        tracing::info!(
            "{}  {}  {} {}  stock {}  [{synced}]",
            product.id,
            product.title,
            studio.settings().currency,
            product.price,
            product.inventory
        );
    }
    Ok(())
}
