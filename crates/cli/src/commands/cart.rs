//! Cart inspection and mutation commands.
//!
//! # Usage
//!
//! ```bash
//! cw-cli cart show
//! cw-cli cart add 3 -q 2
//! cw-cli cart update 3 -q 5
//! cw-cli cart remove 3
//! ```

use cartwheel_core::{ProductId, Quantity};
use cartwheel_storefront::shop::ShopApi;
use cartwheel_storefront::shop::types::Cart;

use super::{CommandError, client};

/// Show the cart contents.
pub async fn show() -> Result<(), CommandError> {
    let client = client()?;
    let cart = client.fetch_cart().await?;
    print_cart(&cart);
    Ok(())
}

/// Add a product to the cart.
pub async fn add(product_id: i64, quantity: u32) -> Result<(), CommandError> {
    let client = client()?;
    // A read first, so the session and CSRF cookies exist before mutating
    client.fetch_cart().await?;
    let cart = client
        .add_to_cart(ProductId::new(product_id), Quantity::new(quantity))
        .await?;
    print_cart(&cart);
    Ok(())
}

/// Set a cart line's quantity.
pub async fn update(product_id: i64, quantity: u32) -> Result<(), CommandError> {
    let client = client()?;
    client.fetch_cart().await?;
    let cart = client
        .update_quantity(ProductId::new(product_id), Quantity::new(quantity))
        .await?;
    print_cart(&cart);
    Ok(())
}

/// Remove a product from the cart.
pub async fn remove(product_id: i64) -> Result<(), CommandError> {
    let client = client()?;
    client.fetch_cart().await?;
    let cart = client.remove_from_cart(ProductId::new(product_id)).await?;
    print_cart(&cart);
    Ok(())
}

/// Print a cart as an aligned table.
fn print_cart(cart: &Cart) {
    if cart.items.is_empty() {
        println!("Cart is empty.");
        return;
    }

    for item in &cart.items {
        println!(
            "{:>6}  {:<32} {:>4} x {:>10} = {:>12}",
            item.id, item.name, item.quantity, item.price, item.subtotal
        );
    }
    println!("{:>72}", format!("Total: {}", cart.total));
}
