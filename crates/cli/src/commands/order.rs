//! Checkout and fulfillment commands.
//!
//! The cart is not persisted, so `order create` fills it from the listed
//! product ids and checks out within the same run.

use storeloom_core::{OrderId, ProductId};
use storeloom_studio::StudioConfig;
use storeloom_studio::models::Customer;

use super::{CommandError, open};

pub async fn create(
    config: &StudioConfig,
    product_ids: &[String],
    customer: Customer,
) -> Result<(), CommandError> {
    let mut studio = open(config).await?;

    for raw in product_ids {
        let id = ProductId::new(raw.as_str());
        let Some(product) = studio.products().iter().find(|p| p.id == id).cloned() else {
            studio.shutdown().await;
            return Err(CommandError::not_found("Product", raw));
        };
        if let Err(rejection) = studio.add_to_cart(&product, None, None) {
            studio.shutdown().await;
            return Err(rejection.into());
        }
    }

    let result = studio.create_order(customer);
    studio.shutdown().await;

    let id = result?;
    tracing::info!(order_id = %id, "Order placed");
    Ok(())
}

pub async fn fulfill(
    config: &StudioConfig,
    id: &str,
    tracking_number: &str,
    carrier: &str,
) -> Result<(), CommandError> {
    let mut studio = open(config).await?;
    let fulfilled = studio.fulfill_order(&OrderId::new(id), tracking_number, carrier);
    studio.shutdown().await;
    if fulfilled {
        Ok(())
    } else {
        Err(CommandError::not_found("Order", id))
    }
}

pub async fn list(config: &StudioConfig) -> Result<(), CommandError> {
    let studio = open(config).await?;
    for order in studio.orders() {
        tracing::info!(
            "{}  {}  {}  {} {}  {:?}",
            order.id,
            order.date.format("%Y-%m-%d"),
            order.customer.name,
            studio.settings().currency,
            order.total,
            order.status
        );
    }
    tracing::info!("Payout balance: {}", studio.payout_balance());
    Ok(())
}
