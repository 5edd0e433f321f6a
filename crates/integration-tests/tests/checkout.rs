//! Cart merging, stock limits and order bookkeeping.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use storeloom_core::{ActivityKind, NotificationKind, OrderStatus, ProductType};
use storeloom_integration_tests::{customer, product, studio};
use storeloom_studio::Rejection;
use storeloom_studio::models::{Customer, LIVE_FEED_CAPACITY};

#[tokio::test]
async fn test_identical_lines_merge_and_distinct_lines_split() {
    let mut studio = studio();
    studio.create_tenant("Shop", "General");
    let mug = product("mug", 10, 4, 10);
    let engraved = BTreeMap::from([("Name".to_string(), "Ada".to_string())]);

    studio.add_to_cart(&mug, None, None).unwrap();
    studio.add_to_cart(&mug, None, None).unwrap();
    studio
        .add_to_cart(&mug, Some(engraved.clone()), None)
        .unwrap();
    studio.add_to_cart(&mug, Some(engraved), None).unwrap();

    let quantities: Vec<u32> = studio.cart().iter().map(|line| line.quantity).collect();
    assert_eq!(quantities, [2, 2]);
}

#[tokio::test]
async fn test_stock_boundary_keeps_quantity() {
    let mut studio = studio();
    studio.create_tenant("Shop", "General");
    let lamp = product("lamp", 40, 10, 3);

    for _ in 0..3 {
        studio.add_to_cart(&lamp, None, None).unwrap();
    }
    let err = studio.add_to_cart(&lamp, None, None).unwrap_err();

    assert_eq!(err, Rejection::StockLimit { available: 3 });
    assert_eq!(studio.cart()[0].quantity, 3);
    assert_eq!(
        studio.notifications().messages(NotificationKind::Error),
        ["Only 3 available"]
    );
}

#[tokio::test]
async fn test_sold_out_product_never_enters_the_cart() {
    let mut studio = studio();
    studio.create_tenant("Shop", "General");

    let err = studio
        .add_to_cart(&product("lamp", 40, 10, 0), None, None)
        .unwrap_err();
    assert_eq!(err, Rejection::OutOfStock);
    assert!(studio.cart().is_empty());

    let mut course = product("course", 99, 0, 0);
    course.product_type = ProductType::Service;
    studio.add_to_cart(&course, None, None).unwrap();
    assert_eq!(studio.cart().len(), 1);
}

#[tokio::test]
async fn test_order_arithmetic_and_bookkeeping() {
    let mut studio = studio();
    studio.create_tenant("Shop", "General");
    let mug = product("mug", 10, 4, 10);
    let cap = product("cap", 5, 1, 10);
    studio.add_to_cart(&mug, None, None).unwrap();
    studio.add_to_cart(&mug, None, None).unwrap();
    studio.add_to_cart(&cap, None, None).unwrap();

    let balance_before = studio.payout_balance();
    let visitors_before = studio.sales_data().last().unwrap().visitors;
    let id = studio.create_order(customer()).unwrap();

    let order = &studio.orders()[0];
    assert_eq!(order.id, id);
    assert_eq!(order.subtotal, Decimal::from(25));
    assert_eq!(order.tax, Decimal::new(200, 2));
    assert_eq!(order.total, Decimal::new(2700, 2));
    assert_eq!(order.cost, Decimal::from(9));
    assert_eq!(order.status, OrderStatus::Unfulfilled);
    assert_eq!(order.items.len(), 2);

    assert_eq!(studio.payout_balance() - balance_before, Decimal::new(2700, 2));
    let today = studio.sales_data().last().unwrap();
    assert_eq!(today.profit, Decimal::from(16));
    assert_eq!(today.visitors, visitors_before + 1);

    let activity = &studio.live_feed()[0];
    assert_eq!(activity.kind, ActivityKind::Order);
    assert_eq!(activity.amount, Some(Decimal::new(2700, 2)));
    assert!(studio.cart().is_empty());
}

#[tokio::test]
async fn test_rejected_checkout_keeps_the_cart() {
    let mut studio = studio();
    studio.create_tenant("Shop", "General");
    studio
        .add_to_cart(&product("mug", 10, 4, 10), None, None)
        .unwrap();

    let mut anonymous = customer();
    anonymous.name = "  ".to_string();
    assert_eq!(
        studio.create_order(anonymous).unwrap_err(),
        Rejection::IncompleteCheckout
    );
    assert_eq!(studio.cart().len(), 1);
    assert!(studio.orders().is_empty());
}

#[tokio::test]
async fn test_live_feed_keeps_latest_twenty() {
    let mut studio = studio();
    studio.create_tenant("Shop", "General");
    let pin = product("pin", 1, 0, 1000);

    for n in 1..=25 {
        studio.add_to_cart(&pin, None, None).unwrap();
        let buyer = Customer {
            name: format!("Buyer {n}"),
            ..customer()
        };
        studio.create_order(buyer).unwrap();
    }

    assert_eq!(LIVE_FEED_CAPACITY, 20);
    let feed = studio.live_feed();
    assert_eq!(feed.len(), 20);
    assert_eq!(feed[0].message, "New Order from Buyer 25");
    assert_eq!(feed[0].amount, Some(studio.orders()[0].total));
    assert_eq!(feed[19].message, "New Order from Buyer 6");
    assert_eq!(studio.orders().len(), 25);
    assert_eq!(studio.orders()[0].id.as_str(), "#1025");
}

#[tokio::test]
async fn test_fulfillment_is_recorded_in_the_feed() {
    let mut studio = studio();
    studio.create_tenant("Shop", "General");
    studio
        .add_to_cart(&product("mug", 10, 4, 10), None, None)
        .unwrap();
    let id = studio.create_order(customer()).unwrap();

    assert!(studio.fulfill_order(&id, "TRK42", "DHL"));
    assert_eq!(studio.orders()[0].carrier.as_deref(), Some("DHL"));
    assert_eq!(studio.live_feed()[0].kind, ActivityKind::Fulfillment);
}
