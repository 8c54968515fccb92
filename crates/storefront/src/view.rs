//! View-model derivation.
//!
//! Pure functions from wire types to template data. No I/O here - the
//! render side of the cart can be tested without a server or a browser.
//! Money strings pass through verbatim; the storefront never recomputes
//! totals the API already computed.

use cartwheel_core::ProductId;

use crate::shop::types::{Cart, CartItem, Product};

/// How long add-to-cart button feedback stays up before reverting, in
/// milliseconds.
pub const ADD_FEEDBACK_REVERT_MS: u64 = 1200;

/// Sum of item quantities for the header badge.
///
/// Quantities are lenient-parsed at the wire boundary, so a malformed or
/// missing quantity contributes 0 rather than poisoning the sum.
#[must_use]
pub fn badge_count(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Cart row display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRowView {
    /// Product id, emitted as the row's `data-id`.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price string, verbatim from the API.
    pub price: String,
    /// Current quantity, seeding the row's number input (`min="1"`).
    pub quantity: u32,
    /// Line subtotal string, verbatim from the API.
    pub subtotal: String,
    /// Thumbnail URL; rows without one render a placeholder.
    pub image_url: Option<String>,
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPageView {
    /// One row per cart line, in server order.
    pub rows: Vec<CartRowView>,
    /// Cart total string, verbatim from the API.
    pub total: String,
    /// Header badge value derived from the same fetch.
    pub badge: u64,
}

impl CartPageView {
    /// True when the empty-state message should render instead of rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<&Cart> for CartPageView {
    fn from(cart: &Cart) -> Self {
        Self {
            rows: cart.items.iter().map(CartRowView::from).collect(),
            total: cart.total.clone(),
            badge: badge_count(&cart.items),
        }
    }
}

impl From<&CartItem> for CartRowView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: item.price.clone(),
            quantity: item.quantity,
            subtotal: item.subtotal.clone(),
            image_url: item.image_url.clone(),
        }
    }
}

/// Product display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    /// Product id, wired into the add-to-cart control.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price string, verbatim from the API.
    pub price: String,
    /// Product description.
    pub description: String,
    /// Image URL; products without one render a placeholder.
    pub image_url: Option<String>,
    /// Category name, if assigned.
    pub category: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            category: product.category.as_ref().map(|c| c.name.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: "10.00".to_string(),
            quantity,
            subtotal: "10.00".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_badge_count_sums_quantities() {
        let items = vec![item(1, 2), item(2, 3)];
        assert_eq!(badge_count(&items), 5);
    }

    #[test]
    fn test_badge_count_treats_unparsed_quantities_as_zero() {
        // A non-numeric wire quantity deserializes to 0 and must not
        // disturb the rest of the sum: [2, "x", 3] -> 5.
        let items: Vec<CartItem> = serde_json::from_str(
            r#"[
                {"id": 1, "name": "A", "price": "1.00", "quantity": 2, "subtotal": "2.00"},
                {"id": 2, "name": "B", "price": "1.00", "quantity": "x", "subtotal": "0.00"},
                {"id": 3, "name": "C", "price": "1.00", "quantity": 3, "subtotal": "3.00"}
            ]"#,
        )
        .unwrap();
        assert_eq!(badge_count(&items), 5);
    }

    #[test]
    fn test_badge_count_empty() {
        assert_eq!(badge_count(&[]), 0);
    }

    #[test]
    fn test_empty_cart_renders_empty_state() {
        let cart = Cart::empty();
        let page = CartPageView::from(&cart);
        assert!(page.is_empty());
        assert!(page.rows.is_empty());
        assert_eq!(page.badge, 0);
    }

    #[test]
    fn test_one_row_per_item_with_matching_ids() {
        let cart = Cart {
            items: vec![item(7, 1), item(9, 4)],
            total: "50.00".to_string(),
        };
        let page = CartPageView::from(&cart);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(
            page.rows.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![ProductId::new(7), ProductId::new(9)]
        );
        assert_eq!(page.badge, 5);
    }

    #[test]
    fn test_total_passes_through_verbatim() {
        // No recomputation: the view shows whatever string the API sent,
        // even when it disagrees with the line items.
        let cart = Cart {
            items: vec![item(1, 1)],
            total: "99999.99".to_string(),
        };
        let page = CartPageView::from(&cart);
        assert_eq!(page.total, "99999.99");
    }

    #[test]
    fn test_row_preserves_price_and_subtotal_strings() {
        let cart = Cart {
            items: vec![CartItem {
                id: ProductId::new(1),
                name: "Teapot".to_string(),
                price: "19.90".to_string(),
                quantity: 2,
                subtotal: "39.80".to_string(),
                image_url: Some("/media/teapot.jpg".to_string()),
            }],
            total: "39.80".to_string(),
        };
        let page = CartPageView::from(&cart);
        let row = page.rows.first().unwrap();
        assert_eq!(row.price, "19.90");
        assert_eq!(row.subtotal, "39.80");
        assert_eq!(row.image_url.as_deref(), Some("/media/teapot.jpg"));
    }

    #[test]
    fn test_product_view_carries_category_name() {
        let product: Product = serde_json::from_str(
            r#"{"id": 5, "name": "Kettle", "price": "59.00",
                "description": "Stove-top kettle",
                "category": {"id": 2, "name": "Kitchen"}}"#,
        )
        .unwrap();
        let view = ProductView::from(&product);
        assert_eq!(view.category.as_deref(), Some("Kitchen"));
        assert_eq!(view.price, "59.00");
    }
}
