//! Best-effort mirroring of products into the payment catalog.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use storeloom_core::{NotificationKind, ProductId, SecretKey};
use storeloom_integration_tests::{CatalogMode, FakeCatalog, TEST_SECRET, builder, product};
use storeloom_studio::Studio;
use storeloom_studio::models::ProductPatch;

const SYNC_FAILED: &str = "Payment catalog sync failed, created locally only.";

async fn connected(catalog: &Arc<FakeCatalog>) -> Studio {
    let mut studio = builder(Arc::clone(catalog)).build().unwrap();
    studio.create_tenant("Shop", "General");
    studio
        .connect_platform("pk_test_1", SecretKey::new(TEST_SECRET))
        .await
        .unwrap();
    studio
}

#[tokio::test]
async fn test_synced_product_gets_both_references() {
    let catalog = FakeCatalog::new(CatalogMode::Accept);
    let mut studio = connected(&catalog).await;

    studio.add_product(product("lamp", 40, 10, 5)).unwrap();
    assert_eq!(studio.pending_catalog_sync(), 1);
    assert_eq!(studio.settle_catalog_sync().await, 1);

    let lamp = &studio.products()[0];
    assert_eq!(lamp.external_product_ref.as_deref(), Some("prod_1"));
    assert_eq!(lamp.external_price_ref.as_deref(), Some("price_1"));
    assert!(
        studio
            .notifications()
            .messages(NotificationKind::Success)
            .contains(&"Synced to payment catalog!".to_string())
    );
}

#[tokio::test]
async fn test_failing_catalog_leaves_local_product_intact() {
    let catalog = FakeCatalog::new(CatalogMode::RejectItems);
    let mut studio = connected(&catalog).await;

    studio.add_product(product("lamp", 40, 10, 5)).unwrap();
    assert_eq!(studio.settle_catalog_sync().await, 0);

    assert_eq!(studio.products().len(), 1);
    let lamp = &studio.products()[0];
    assert!(lamp.external_product_ref.is_none());
    assert!(lamp.external_price_ref.is_none());
    assert_eq!(catalog.price_calls(), 0);
    assert_eq!(
        studio.notifications().messages(NotificationKind::Error),
        [SYNC_FAILED]
    );
}

#[tokio::test]
async fn test_price_failure_keeps_item_reference() {
    let catalog = FakeCatalog::new(CatalogMode::RejectPrices);
    let mut studio = connected(&catalog).await;

    studio.add_product(product("lamp", 40, 10, 5)).unwrap();
    assert_eq!(studio.settle_catalog_sync().await, 1);

    let lamp = &studio.products()[0];
    assert_eq!(lamp.external_product_ref.as_deref(), Some("prod_1"));
    assert!(lamp.external_price_ref.is_none());
    assert_eq!(
        studio.notifications().messages(NotificationKind::Error),
        [SYNC_FAILED]
    );
}

#[tokio::test]
async fn test_without_keys_nothing_is_mirrored() {
    let catalog = FakeCatalog::new(CatalogMode::Accept);
    let mut studio = builder(Arc::clone(&catalog)).build().unwrap();
    studio.create_tenant("Shop", "General");

    studio.add_product(product("lamp", 40, 10, 5)).unwrap();
    assert_eq!(studio.pending_catalog_sync(), 0);
    studio.shutdown().await;
    assert_eq!(catalog.item_calls(), 0);
}

#[tokio::test]
async fn test_local_edits_survive_a_late_sync() {
    let catalog = FakeCatalog::new(CatalogMode::Accept);
    let mut studio = connected(&catalog).await;
    let id = studio.add_product(product("lamp", 40, 10, 5)).unwrap();

    // The sync task has not run yet on this single-threaded runtime.
    assert!(studio.update_product(
        &id,
        ProductPatch {
            inventory: Some(2),
            ..ProductPatch::default()
        }
    ));
    studio.settle_catalog_sync().await;

    let lamp = &studio.products()[0];
    assert_eq!(lamp.inventory, 2);
    assert_eq!(lamp.external_product_ref.as_deref(), Some("prod_1"));
}

#[tokio::test]
async fn test_sync_lands_on_origin_tenant_after_switch() {
    let catalog = FakeCatalog::new(CatalogMode::Accept);
    let mut studio = connected(&catalog).await;
    let origin = studio.collection().active_id().cloned().unwrap();
    studio.add_product(product("lamp", 40, 10, 5)).unwrap();

    studio.create_tenant("Other", "General");
    studio.settle_catalog_sync().await;

    assert!(studio.products().is_empty());
    let origin_store = studio.collection().get(&origin).unwrap();
    assert_eq!(
        origin_store.products[0].external_product_ref.as_deref(),
        Some("prod_1")
    );
}

#[tokio::test]
async fn test_listing_changes_are_pushed_to_the_catalog() {
    let catalog = FakeCatalog::new(CatalogMode::Accept);
    let mut studio = connected(&catalog).await;
    let id = studio.add_product(product("lamp", 40, 10, 5)).unwrap();
    studio.settle_catalog_sync().await;

    let renamed = ProductPatch {
        title: Some("Desk Lamp".to_string()),
        ..ProductPatch::default()
    };
    assert!(studio.update_product(&id, renamed));
    let restocked = ProductPatch {
        inventory: Some(9),
        ..ProductPatch::default()
    };
    assert!(studio.update_product(&id, restocked));
    assert!(!studio.update_product(&ProductId::new("ghost"), ProductPatch::default()));
    studio.shutdown().await;

    let updates = catalog.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "prod_1");
    assert_eq!(updates[0].1.name.as_deref(), Some("Desk Lamp"));
}
