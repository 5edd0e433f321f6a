//! Checkout and fulfillment.

use chrono::Utc;
use tracing::instrument;

use storeloom_core::{ActivityId, ActivityKind, Email, OrderId, OrderStatus};

use crate::error::Rejection;
use crate::ids;
use crate::models::activity::JUST_NOW;
use crate::models::{Customer, LiveActivity, Order, OrderTotals};

use super::Studio;

/// Display ids start after this number.
const ORDER_NUMBER_BASE: usize = 1000;

const PAYMENT_METHOD: &str = "Credit Card";

/// Name, a parseable email and an address are required.
fn checkout_complete(customer: &Customer) -> bool {
    !customer.name.trim().is_empty()
        && !customer.address.trim().is_empty()
        && Email::parse(&customer.email).is_ok()
}

impl Studio {
    /// Turn the cart into an order on the active tenant.
    ///
    /// Books the total into the payout balance and today's sales, records an
    /// activity entry and empties the cart, all in one tenant update.
    ///
    /// # Errors
    ///
    /// Returns `Rejection::EmptyCart`, `Rejection::IncompleteCheckout` or
    /// `Rejection::NoActiveStore`; the cart is kept in each case.
    #[instrument(skip_all, fields(lines = self.cart.len()))]
    pub fn create_order(&mut self, customer: Customer) -> Result<OrderId, Rejection> {
        if self.cart.is_empty() {
            return Err(self.reject(Rejection::EmptyCart));
        }
        if !checkout_complete(&customer) {
            return Err(self.reject(Rejection::IncompleteCheckout));
        }
        let Some(store) = self
            .writable_tenant_id()
            .and_then(|id| self.collection.get(&id))
        else {
            return Err(self.reject(Rejection::NoActiveStore));
        };

        let totals = OrderTotals::compute(&self.cart, store.tax_rate());
        let order_id = OrderId::new(format!(
            "#{}",
            ORDER_NUMBER_BASE + store.orders.len() + 1
        ));
        let activity = LiveActivity {
            id: ActivityId::new(ids::short_token()),
            kind: ActivityKind::Order,
            message: format!("New Order from {}", customer.name),
            timestamp: JUST_NOW.to_string(),
            amount: Some(totals.total),
            customer_location: Some(format!("{}, {}", customer.city, customer.country)),
        };
        let order = Order {
            id: order_id.clone(),
            customer,
            items: std::mem::take(&mut self.cart),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            cost: totals.cost,
            date: Utc::now(),
            status: OrderStatus::Unfulfilled,
            payment_method: PAYMENT_METHOD.to_string(),
            tracking_number: None,
            carrier: None,
            transaction_id: Some(format!("ord_{}", ids::short_token())),
        };

        self.modify_active_tenant(|store| {
            store.orders.insert(0, order);
            store.payout_balance += totals.total;
            if let Some(today) = store.sales_data.last_mut() {
                today.sales += totals.total;
                today.profit += totals.profit;
                today.visitors += 1;
            }
            store.live_feed.push(activity);
        });

        tracing::info!(order_id = %order_id, total = %totals.total, "Order created");
        Ok(order_id)
    }

    /// Mark an order shipped. Unknown ids are ignored.
    pub fn fulfill_order(&mut self, id: &OrderId, tracking_number: &str, carrier: &str) -> bool {
        let mut found = false;
        self.modify_active_tenant(|store| {
            let Some(order) = store.orders.iter_mut().find(|o| &o.id == id) else {
                return;
            };
            order.status = OrderStatus::Fulfilled;
            order.tracking_number = Some(tracking_number.to_string());
            order.carrier = Some(carrier.to_string());
            store.live_feed.push(LiveActivity {
                id: ActivityId::new(ids::short_token()),
                kind: ActivityKind::Fulfillment,
                message: format!("Order {id} Shipped via {carrier}"),
                timestamp: JUST_NOW.to_string(),
                amount: None,
                customer_location: None,
            });
            found = true;
        });

        if found {
            self.notifications
                .success(format!("Order {id} marked as fulfilled."));
        }
        found
    }
}
