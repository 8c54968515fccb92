//! Product browsing commands.
//!
//! # Usage
//!
//! ```bash
//! cw-cli products list
//! cw-cli products show 3
//! ```

use cartwheel_core::ProductId;
use cartwheel_storefront::shop::ShopApi;

use super::{CommandError, client};

/// List all products.
pub async fn list() -> Result<(), CommandError> {
    let client = client()?;
    let products = client.list_products().await?;

    if products.is_empty() {
        println!("No products.");
        return Ok(());
    }

    for product in &products {
        let category = product
            .category
            .as_ref()
            .map_or_else(String::new, |c| format!("  [{}]", c.name));
        println!("{:>6}  {:<32} {:>10}{category}", product.id, product.name, product.price);
    }
    Ok(())
}

/// Show a single product.
pub async fn show(product_id: i64) -> Result<(), CommandError> {
    let client = client()?;
    let product = client.get_product(ProductId::new(product_id)).await?;

    println!("#{} {}", product.id, product.name);
    println!("Price: {}", product.price);
    if let Some(category) = &product.category {
        println!("Category: {}", category.name);
    }
    if !product.description.is_empty() {
        println!("\n{}", product.description);
    }
    Ok(())
}
