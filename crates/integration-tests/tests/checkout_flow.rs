//! End-to-end checkout flows: outcome tagging, order recording, cart reset.

use cartwheel_core::{Email, ProductId, Quantity};
use cartwheel_integration_tests::TestContext;
use cartwheel_storefront::shop::ShopApi;
use cartwheel_storefront::shop::types::CheckoutOutcome;

#[tokio::test]
async fn checkout_empty_cart_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.client.fetch_cart().await.expect("prime cookies");

    let outcome = ctx.client.checkout(None).await.expect("checkout call");

    match outcome {
        CheckoutOutcome::Rejected { detail } => assert_eq!(detail, "Cart is empty."),
        CheckoutOutcome::Placed(order) => panic!("unexpected order: {}", order.id),
    }
    assert!(ctx.stub.orders().is_empty());
}

#[tokio::test]
async fn checkout_places_order_and_clears_cart() {
    let ctx = TestContext::new().await;
    ctx.client.fetch_cart().await.expect("prime cookies");

    ctx.client
        .add_to_cart(ProductId::new(1), Quantity::new(2))
        .await
        .expect("add teapots");
    ctx.client
        .add_to_cart(ProductId::new(3), Quantity::new(1))
        .await
        .expect("add tray");

    let email = Email::parse("a@b.com").expect("valid email");
    let outcome = ctx
        .client
        .checkout(Some(email))
        .await
        .expect("checkout call");

    match outcome {
        CheckoutOutcome::Placed(order) => {
            assert_eq!(order.id.as_i64(), 1);
            assert_eq!(order.total, "159.98");
        }
        CheckoutOutcome::Rejected { detail } => panic!("rejected: {detail}"),
    }

    let orders = ctx.stub.orders();
    assert_eq!(orders.len(), 1);
    let order = orders.first().expect("one order");
    assert_eq!(order.email.as_deref(), Some("a@b.com"));
    assert_eq!(order.total, "159.98");

    // The cart is spent after checkout
    let cart = ctx.client.fetch_cart().await.expect("re-fetch");
    assert!(cart.items.is_empty());
    assert_eq!(cart.total, "0.00");
}

#[tokio::test]
async fn guest_checkout_without_email() {
    let ctx = TestContext::new().await;
    ctx.client.fetch_cart().await.expect("prime cookies");

    ctx.client
        .add_to_cart(ProductId::new(2), Quantity::new(1))
        .await
        .expect("add mug");

    let outcome = ctx.client.checkout(None).await.expect("checkout call");

    assert!(matches!(outcome, CheckoutOutcome::Placed(_)));
    let orders = ctx.stub.orders();
    assert_eq!(orders.first().and_then(|o| o.email.as_deref()), None);
}

#[tokio::test]
async fn consecutive_orders_get_increasing_ids() {
    let ctx = TestContext::new().await;
    ctx.client.fetch_cart().await.expect("prime cookies");

    for expected_id in 1..=2 {
        ctx.client
            .add_to_cart(ProductId::new(2), Quantity::new(1))
            .await
            .expect("add mug");
        let outcome = ctx.client.checkout(None).await.expect("checkout call");
        match outcome {
            CheckoutOutcome::Placed(order) => assert_eq!(order.id.as_i64(), expected_id),
            CheckoutOutcome::Rejected { detail } => panic!("rejected: {detail}"),
        }
    }
}
