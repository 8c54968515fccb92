//! CSRF behavior: token observation, replay, and rejection.

use cartwheel_core::{ProductId, Quantity};
use cartwheel_integration_tests::TestContext;
use cartwheel_storefront::shop::{ShopApi, ShopError};
use cartwheel_storefront::shop::types::CheckoutOutcome;

#[tokio::test]
async fn mutation_without_prior_read_is_rejected() {
    let ctx = TestContext::new().await;

    // No GET has happened, so the client sends an empty token
    let err = ctx
        .client
        .add_to_cart(ProductId::new(1), Quantity::MIN)
        .await
        .expect_err("mutation must be rejected");

    match err {
        ShopError::Status { status, .. } => {
            assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn read_primes_the_token_for_mutations() {
    let ctx = TestContext::new().await;

    ctx.client.fetch_cart().await.expect("read issues the cookie");

    // The observed token is now replayed in X-CSRFToken
    let cart = ctx
        .client
        .add_to_cart(ProductId::new(1), Quantity::MIN)
        .await
        .expect("mutation with token succeeds");
    assert_eq!(cart.items.len(), 1);
}

#[tokio::test]
async fn each_client_has_its_own_token_state() {
    let ctx = TestContext::new().await;
    ctx.client.fetch_cart().await.expect("prime first client");

    // A second client with a fresh cookie jar has seen nothing
    let fresh = ctx.fresh_client();
    let err = fresh
        .add_to_cart(ProductId::new(1), Quantity::MIN)
        .await
        .expect_err("fresh client must be rejected");
    assert!(matches!(err, ShopError::Status { .. }));
}

#[tokio::test]
async fn rejected_checkout_surfaces_the_payload_detail() {
    let ctx = TestContext::new().await;

    // Checkout parses the payload for any status, so a CSRF rejection
    // arrives as a tagged outcome rather than a status error
    let outcome = ctx.client.checkout(None).await.expect("checkout call");
    match outcome {
        CheckoutOutcome::Rejected { detail } => {
            assert_eq!(detail, "CSRF verification failed.");
        }
        CheckoutOutcome::Placed(order) => panic!("unexpected order: {}", order.id),
    }
}

#[tokio::test]
async fn reads_issue_the_csrf_cookie() {
    let ctx = TestContext::new().await;

    let response = reqwest::get(format!("{}/api/cart/", ctx.base_url()))
        .await
        .expect("raw GET");
    let cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("cookie issued on read");

    assert!(cookie.to_str().expect("ascii cookie").starts_with("csrftoken="));
}
