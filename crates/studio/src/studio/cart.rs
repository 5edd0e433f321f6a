//! The shopping cart. Global, not per tenant.

use std::collections::BTreeMap;

use storeloom_core::ProductId;

use crate::error::Rejection;
use crate::models::{CartItem, Product, ProductVariant};

use super::Studio;

impl Studio {
    #[must_use]
    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    #[must_use]
    pub const fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    pub const fn set_cart_open(&mut self, open: bool) {
        self.cart_open = open;
    }

    /// Add one unit, merging with an identical line.
    ///
    /// Lines are identical when product, variant and answers all match.
    ///
    /// # Errors
    ///
    /// For stock-tracked products, returns `Rejection::OutOfStock` when
    /// nothing is on hand and `Rejection::StockLimit` when the line already
    /// holds every unit.
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        answers: Option<BTreeMap<String, String>>,
        variant: Option<ProductVariant>,
    ) -> Result<(), Rejection> {
        let tracked = product.product_type.tracks_inventory();
        let stock = product.stock(variant.as_ref());
        if tracked && stock <= 0 {
            return Err(self.reject(Rejection::OutOfStock));
        }

        let key = CartItem::line_key(product, variant.as_ref(), answers.as_ref());
        match self.cart.iter().position(|line| line.key() == key) {
            Some(index) => {
                let quantity = self.cart.get(index).map_or(0, |line| line.quantity);
                if tracked && i64::from(quantity) >= stock {
                    return Err(self.reject(Rejection::StockLimit { available: stock }));
                }
                if let Some(line) = self.cart.get_mut(index) {
                    line.quantity += 1;
                }
            }
            None => self.cart.push(CartItem {
                product: product.clone(),
                quantity: 1,
                answers,
                selected_variant: variant,
            }),
        }

        self.cart_open = true;
        self.notifications.success("Added to bag");
        Ok(())
    }

    /// Drop every line of a product, whatever its variant or answers.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        self.cart.retain(|line| &line.product.id != product_id);
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }
}
