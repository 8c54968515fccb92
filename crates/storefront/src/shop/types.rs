//! Wire types for the shop API.
//!
//! Money values (`price`, `subtotal`, `total`) are decimal strings computed
//! server-side. The storefront never does arithmetic on them - they pass
//! through to the page verbatim.

use cartwheel_core::{CategoryId, OrderId, ProductId};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Cart Types
// =============================================================================

/// A line in the cart as the shop API reports it.
///
/// Read-only display data, except `quantity`, which the view may propose
/// changes to through the update endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Product id.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price as a decimal string.
    pub price: String,
    /// Line quantity. Lenient: a non-numeric or missing value becomes 0,
    /// so a malformed line never breaks the badge sum.
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    /// Line subtotal as a decimal string, computed server-side.
    pub subtotal: String,
    /// Product image URL, if the product has one.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// The cart as the shop API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Cart lines, in server order.
    pub items: Vec<CartItem>,
    /// Cart total as a decimal string, computed server-side.
    pub total: String,
}

impl Cart {
    /// An empty cart with a zero total, used when the API reports nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: "0.00".to_string(),
        }
    }
}

/// Deserialize a quantity leniently: JSON numbers and numeric strings parse
/// normally, anything else (including absence) becomes 0.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    })
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Body of `POST /api/cart/add/` and `POST /api/cart/update/`.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineRequest {
    /// Product to add or update.
    pub product_id: ProductId,
    /// Proposed quantity.
    pub quantity: u32,
}

/// Body of `POST /api/cart/remove/`.
#[derive(Debug, Clone, Serialize)]
pub struct CartRemoveRequest {
    /// Product to remove.
    pub product_id: ProductId,
}

/// Body of `POST /api/checkout/`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    /// Guest email, when the checkout form supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// =============================================================================
// Checkout Types
// =============================================================================

/// A placed order.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// Order id.
    pub id: OrderId,
    /// Order total as a decimal string.
    pub total: String,
}

/// Outcome of a checkout attempt, tagged by payload shape: an order carries
/// an `id`, a rejection carries a `detail` message.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CheckoutOutcome {
    /// The order was created.
    Placed(Order),
    /// The API rejected the checkout (e.g., empty cart).
    Rejected {
        /// Server-provided failure message.
        detail: String,
    },
}

// =============================================================================
// Product Types
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
}

/// A product as the shop API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product id.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price as a decimal string.
    pub price: String,
    /// Product description.
    #[serde(default)]
    pub description: String,
    /// Product image URL, if any.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Category, if assigned.
    #[serde(default)]
    pub category: Option<Category>,
}
