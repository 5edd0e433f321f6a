//! Cart lines, orders and discounts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storeloom_core::{DiscountId, OrderId, OrderStatus, round_cents};

use super::product::{Product, ProductVariant};

/// Shipping and contact details captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub country: String,
}

/// One line of the shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
    #[serde(default)]
    pub answers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub selected_variant: Option<ProductVariant>,
}

impl CartItem {
    /// Composite identity used to merge repeated adds of the same thing.
    ///
    /// Product id, then `-<variant id>` when a variant is selected, then the
    /// answers serialized as key-sorted JSON when present.
    #[must_use]
    pub fn line_key(
        product: &Product,
        variant: Option<&ProductVariant>,
        answers: Option<&BTreeMap<String, String>>,
    ) -> String {
        let mut key = product.id.to_string();
        if let Some(variant) = variant {
            key.push('-');
            key.push_str(variant.id.as_str());
        }
        if let Some(answers) = answers {
            key.push_str(&serde_json::to_string(answers).unwrap_or_default());
        }
        key
    }

    /// This line's composite identity.
    #[must_use]
    pub fn key(&self) -> String {
        Self::line_key(
            &self.product,
            self.selected_variant.as_ref(),
            self.answers.as_ref(),
        )
    }

    /// Unit price charged for this line.
    ///
    /// The product's own price applies even when a variant is selected.
    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.product.price
    }
}

/// Money totals of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub profit: Decimal,
}

impl OrderTotals {
    /// Compute totals for a cart at the given tax rate.
    ///
    /// Tax is rounded to cents, half away from zero.
    #[must_use]
    pub fn compute(items: &[CartItem], tax_rate: Decimal) -> Self {
        let (subtotal, cost) = items.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(subtotal, cost), item| {
                let quantity = Decimal::from(item.quantity);
                (
                    subtotal + item.unit_price() * quantity,
                    cost + item.product.cost_per_item * quantity,
                )
            },
        );
        let tax = round_cents(subtotal * tax_rate);
        Self {
            subtotal,
            cost,
            tax,
            total: subtotal + tax,
            profit: subtotal - cost,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Display id such as `#1001`.
    pub id: OrderId,
    pub customer: Customer,
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub cost: Decimal,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    pub payment_method: String,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// A percentage discount code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub id: DiscountId,
    pub code: String,
    pub percentage: u32,
    pub uses: u32,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use storeloom_core::{ProductId, VariantId};

    fn product(id: &str, price: i64, cost: i64) -> Product {
        Product {
            id: ProductId::new(id),
            price: Decimal::from(price),
            cost_per_item: Decimal::from(cost),
            ..Product::default()
        }
    }

    fn line(product: Product, quantity: u32) -> CartItem {
        CartItem {
            product,
            quantity,
            answers: None,
            selected_variant: None,
        }
    }

    #[test]
    fn test_order_totals() {
        let items = vec![line(product("a", 10, 4), 2), line(product("b", 5, 1), 1)];
        let totals = OrderTotals::compute(&items, Decimal::new(8, 2));

        assert_eq!(totals.subtotal, Decimal::from(25));
        assert_eq!(totals.tax, Decimal::new(200, 2));
        assert_eq!(totals.total, Decimal::new(2700, 2));
        assert_eq!(totals.cost, Decimal::from(9));
        assert_eq!(totals.profit, Decimal::from(16));
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        // 0.0625 * 0.08 = 0.005 -> 0.01
        let mut item = product("a", 0, 0);
        item.price = Decimal::new(625, 4);
        let totals = OrderTotals::compute(&[line(item, 1)], Decimal::new(8, 2));
        assert_eq!(totals.tax, Decimal::new(1, 2));
    }

    #[test]
    fn test_line_key_components() {
        let p = product("p1", 1, 0);
        let variant = ProductVariant {
            id: VariantId::new("v2"),
            ..ProductVariant::default()
        };
        let mut answers = BTreeMap::new();
        answers.insert("size".to_string(), "M".to_string());
        answers.insert("engrave".to_string(), "yes".to_string());

        assert_eq!(CartItem::line_key(&p, None, None), "p1");
        assert_eq!(CartItem::line_key(&p, Some(&variant), None), "p1-v2");
        assert_eq!(
            CartItem::line_key(&p, Some(&variant), Some(&answers)),
            r#"p1-v2{"engrave":"yes","size":"M"}"#
        );
    }
}
