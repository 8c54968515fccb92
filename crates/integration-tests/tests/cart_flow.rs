//! End-to-end cart flows: the real client against the stub shop API.

use cartwheel_core::{ProductId, Quantity};
use cartwheel_integration_tests::TestContext;
use cartwheel_storefront::shop::{ShopApi, ShopError};
use cartwheel_storefront::view::badge_count;

#[tokio::test]
async fn fetch_empty_cart() {
    let ctx = TestContext::new().await;

    let cart = ctx.client.fetch_cart().await.expect("fetch cart");

    assert!(cart.items.is_empty());
    assert_eq!(cart.total, "0.00");
}

#[tokio::test]
async fn add_then_fetch_reflects_server_state() {
    let ctx = TestContext::new().await;
    ctx.client.fetch_cart().await.expect("prime cookies");

    let cart = ctx
        .client
        .add_to_cart(ProductId::new(1), Quantity::new(2))
        .await
        .expect("add to cart");

    assert_eq!(cart.items.len(), 1);
    let item = cart.items.first().expect("one item");
    assert_eq!(item.id, ProductId::new(1));
    assert_eq!(item.quantity, 2);
    assert_eq!(item.price, "19.99");
    assert_eq!(item.subtotal, "39.98");
    assert_eq!(cart.total, "39.98");
    assert_eq!(badge_count(&cart.items), 2);

    // The next fetch shows the same state - the server is the only truth
    let fetched = ctx.client.fetch_cart().await.expect("re-fetch");
    assert_eq!(fetched.total, "39.98");
}

#[tokio::test]
async fn adding_same_product_accumulates() {
    let ctx = TestContext::new().await;
    ctx.client.fetch_cart().await.expect("prime cookies");

    ctx.client
        .add_to_cart(ProductId::new(1), Quantity::new(1))
        .await
        .expect("first add");
    let cart = ctx
        .client
        .add_to_cart(ProductId::new(1), Quantity::new(2))
        .await
        .expect("second add");

    let item = cart.items.first().expect("one item");
    assert_eq!(item.quantity, 3);
    assert_eq!(item.subtotal, "59.97");
}

#[tokio::test]
async fn update_sets_exact_quantity() {
    let ctx = TestContext::new().await;
    ctx.client.fetch_cart().await.expect("prime cookies");

    ctx.client
        .add_to_cart(ProductId::new(1), Quantity::new(2))
        .await
        .expect("add");
    let cart = ctx
        .client
        .update_quantity(ProductId::new(1), Quantity::new(5))
        .await
        .expect("update");

    let item = cart.items.first().expect("one item");
    assert_eq!(item.quantity, 5);
    assert_eq!(cart.total, "99.95");
}

#[tokio::test]
async fn remove_deletes_only_that_line() {
    let ctx = TestContext::new().await;
    ctx.client.fetch_cart().await.expect("prime cookies");

    ctx.client
        .add_to_cart(ProductId::new(1), Quantity::new(1))
        .await
        .expect("add teapot");
    ctx.client
        .add_to_cart(ProductId::new(2), Quantity::new(4))
        .await
        .expect("add mugs");

    let cart = ctx
        .client
        .remove_from_cart(ProductId::new(1))
        .await
        .expect("remove teapot");

    assert_eq!(cart.items.len(), 1);
    let item = cart.items.first().expect("one item");
    assert_eq!(item.id, ProductId::new(2));
    assert_eq!(cart.total, "22.00");
    assert_eq!(badge_count(&cart.items), 4);
}

#[tokio::test]
async fn product_listing_and_detail() {
    let ctx = TestContext::new().await;

    let products = ctx.client.list_products().await.expect("list products");
    assert_eq!(products.len(), 3);

    let teapot = ctx
        .client
        .get_product(ProductId::new(1))
        .await
        .expect("get product");
    assert_eq!(teapot.name, "Cast iron teapot");
    assert_eq!(teapot.price, "19.99");
    assert_eq!(
        teapot.category.as_ref().map(|c| c.name.as_str()),
        Some("Kitchen")
    );
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let ctx = TestContext::new().await;

    let err = ctx
        .client
        .get_product(ProductId::new(99))
        .await
        .expect_err("no such product");

    assert!(matches!(err, ShopError::NotFound(_)));
}
