//! Catalog products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storeloom_core::{OptionId, ProductId, ProductStatus, ProductType, QuestionId, VariantId};

/// A purchasable variant of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub title: String,
    pub price: Decimal,
    pub inventory: i64,
    #[serde(default)]
    pub sku: Option<String>,
}

/// An option axis such as "Size" or "Color".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: OptionId,
    pub name: String,
    pub values: Vec<String>,
}

/// Input type of a buyer question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[default]
    Text,
    Select,
    Boolean,
}

/// A question the buyer answers when adding the product to the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerQuestion {
    pub id: QuestionId,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
}

/// A catalog product.
///
/// `external_product_ref` and `external_price_ref` are owned by catalog sync
/// and are never touched by [`ProductPatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub cost_per_item: Decimal,
    pub image: String,
    pub images: Vec<String>,
    pub category: String,
    pub inventory: i64,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub status: ProductStatus,
    pub supplier_url: Option<String>,
    pub product_type: ProductType,
    pub vendor: Option<String>,
    pub has_variants: bool,
    pub variants: Vec<ProductVariant>,
    pub options: Vec<ProductOption>,
    pub tags: Vec<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub handle: Option<String>,
    pub features: Vec<String>,
    pub buyer_questions: Vec<BuyerQuestion>,
    pub external_product_ref: Option<String>,
    pub external_price_ref: Option<String>,
}

impl Product {
    /// Units available for purchase, for the product or one of its variants.
    #[must_use]
    pub fn stock(&self, variant: Option<&ProductVariant>) -> i64 {
        variant.map_or(self.inventory, |v| v.inventory)
    }
}

/// Partial product update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub compare_at_price: Option<Decimal>,
    pub cost_per_item: Option<Decimal>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub inventory: Option<i64>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub status: Option<ProductStatus>,
    pub supplier_url: Option<String>,
    pub product_type: Option<ProductType>,
    pub vendor: Option<String>,
    pub has_variants: Option<bool>,
    pub variants: Option<Vec<ProductVariant>>,
    pub options: Option<Vec<ProductOption>>,
    pub tags: Option<Vec<String>>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub handle: Option<String>,
    pub features: Option<Vec<String>>,
    pub buyer_questions: Option<Vec<BuyerQuestion>>,
}

impl ProductPatch {
    /// Whether the patch changes a field mirrored in the payment catalog.
    #[must_use]
    pub fn touches_listing(&self) -> bool {
        self.title.as_ref().is_some_and(|t| !t.is_empty())
            || self.description.as_ref().is_some_and(|d| !d.is_empty())
    }
}

impl Product {
    /// Shallow merge of a patch.
    pub fn apply(&mut self, patch: ProductPatch) {
        merge_fields!(self, patch; set: [
            title,
            description,
            price,
            cost_per_item,
            image,
            images,
            category,
            inventory,
            status,
            product_type,
            has_variants,
            variants,
            options,
            tags,
            features,
            buyer_questions,
        ]; wrap: [
            compare_at_price,
            sku,
            barcode,
            supplier_url,
            vendor,
            seo_title,
            seo_description,
            handle,
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_prefers_variant() {
        let product = Product {
            inventory: 10,
            ..Product::default()
        };
        let variant = ProductVariant {
            inventory: 2,
            ..ProductVariant::default()
        };
        assert_eq!(product.stock(None), 10);
        assert_eq!(product.stock(Some(&variant)), 2);
    }

    #[test]
    fn test_patch_keeps_external_refs() {
        let mut product = Product {
            title: "Mug".to_string(),
            external_product_ref: Some("prod_1".to_string()),
            ..Product::default()
        };
        product.apply(ProductPatch {
            title: Some("Big Mug".to_string()),
            inventory: Some(4),
            ..ProductPatch::default()
        });

        assert_eq!(product.title, "Big Mug");
        assert_eq!(product.inventory, 4);
        assert_eq!(product.external_product_ref.as_deref(), Some("prod_1"));
    }

    #[test]
    fn test_touches_listing() {
        assert!(!ProductPatch::default().touches_listing());
        assert!(
            ProductPatch {
                description: Some("New copy".to_string()),
                ..ProductPatch::default()
            }
            .touches_listing()
        );
        assert!(
            !ProductPatch {
                title: Some(String::new()),
                price: Some(Decimal::ONE),
                ..ProductPatch::default()
            }
            .touches_listing()
        );
    }
}
