//! Checkout command.
//!
//! # Usage
//!
//! ```bash
//! cw-cli checkout -e you@example.com
//! ```

use cartwheel_core::Email;
use cartwheel_storefront::shop::ShopApi;
use cartwheel_storefront::shop::types::CheckoutOutcome;

use super::{CommandError, client};

/// Place an order from the cart contents.
///
/// The email is validated locally before anything is sent, the same check
/// the storefront applies to its checkout form.
pub async fn place_order(email: Option<&str>) -> Result<(), CommandError> {
    let email = email.map(Email::parse).transpose()?;

    let client = client()?;
    // A read first, so the session and CSRF cookies exist before mutating
    client.fetch_cart().await?;

    match client.checkout(email).await? {
        CheckoutOutcome::Placed(order) => {
            println!("Order #{} placed! Total: {}", order.id, order.total);
            Ok(())
        }
        CheckoutOutcome::Rejected { detail } => Err(CommandError::CheckoutRejected(detail)),
    }
}
