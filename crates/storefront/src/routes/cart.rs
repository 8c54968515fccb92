//! Cart route handlers.
//!
//! Cart interactions use HTMX fragments for dynamic updates without full
//! page reloads. Every mutation follows the same pipeline: one API call,
//! then a fresh cart fetch, then a full re-render of the fragment - the
//! view never patches its own copy of the state.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use cartwheel_core::{ProductId, Quantity};

use crate::error::Result;
use crate::filters;
use crate::shop::types::Cart;
use crate::shop::{ShopApi, ShopError};
use crate::state::AppState;
use crate::view::{ADD_FEEDBACK_REVERT_MS, CartPageView, badge_count};

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: CartPageView,
}

/// Cart items fragment template with an out-of-band badge update (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_refresh.html")]
pub struct CartRefreshTemplate {
    pub page: CartPageView,
}

/// Cart count badge fragment template (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Transient add-to-cart feedback fragment (HTMX).
///
/// Carries the updated badge out-of-band and reverts itself to the idle
/// button after `revert_ms`.
#[derive(Template, WebTemplate)]
#[template(path = "partials/add_feedback.html")]
pub struct AddFeedbackTemplate {
    pub product_id: ProductId,
    pub count: u64,
    pub revert_ms: u64,
}

/// Idle add-to-cart button fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/add_button.html")]
pub struct AddButtonTemplate {
    pub product_id: ProductId,
}

// =============================================================================
// Forms
// =============================================================================

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    /// Raw quantity input; clamped server-side, so a cleared or garbled
    /// field still produces a valid request.
    pub quantity: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    /// Raw quantity from the shared page-level field, when present.
    pub quantity: Option<String>,
}

/// Query for the idle add-to-cart button fragment.
#[derive(Debug, Deserialize)]
pub struct AddButtonQuery {
    pub product_id: ProductId,
}

// =============================================================================
// Flows
// =============================================================================

/// Clamp a raw quantity field: absent, non-numeric, and sub-1 values all
/// become 1.
fn clamp_field(raw: Option<&str>) -> Quantity {
    raw.map_or(Quantity::MIN, Quantity::parse_lenient)
}

/// Propose a quantity change, then refresh.
///
/// Exactly one update request per submitted change - no debounce, no
/// coalescing - followed by exactly one fetch that the re-render is derived
/// from.
pub(crate) async fn change_quantity<S: ShopApi>(
    shop: &S,
    product_id: ProductId,
    raw_quantity: Option<&str>,
) -> std::result::Result<Cart, ShopError> {
    let quantity = clamp_field(raw_quantity);
    shop.update_quantity(product_id, quantity).await?;
    shop.fetch_cart().await
}

/// Remove a line, then refresh.
pub(crate) async fn remove_line<S: ShopApi>(
    shop: &S,
    product_id: ProductId,
) -> std::result::Result<Cart, ShopError> {
    shop.remove_from_cart(product_id).await?;
    shop.fetch_cart().await
}

/// Badge count with failure swallowed.
///
/// The one call site that ignores fetch errors: the badge renders 0 and
/// the page carries on.
pub(crate) async fn badge_or_zero<S: ShopApi>(shop: &S) -> u64 {
    match shop.fetch_cart().await {
        Ok(cart) => badge_count(&cart.items),
        Err(e) => {
            tracing::debug!(error = %e, "badge refresh failed, rendering 0");
            0
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<CartShowTemplate> {
    let cart = state.shop().fetch_cart().await?;
    Ok(CartShowTemplate {
        page: CartPageView::from(&cart),
    })
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> CartCountTemplate {
    CartCountTemplate {
        count: badge_or_zero(state.shop()).await,
    }
}

/// Update cart line quantity (HTMX).
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<UpdateCartForm>,
) -> Result<CartRefreshTemplate> {
    let cart = change_quantity(state.shop(), form.product_id, form.quantity.as_deref()).await?;
    Ok(CartRefreshTemplate {
        page: CartPageView::from(&cart),
    })
}

/// Remove item from cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<CartRefreshTemplate> {
    let cart = remove_line(state.shop(), form.product_id).await?;
    Ok(CartRefreshTemplate {
        page: CartPageView::from(&cart),
    })
}

/// Add item to cart (HTMX).
///
/// The badge is derived from the add response itself; the button swaps to
/// transient feedback that reverts via [`add_button`]. Rapid repeated
/// clicks each produce their own request - last write wins upstream.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<AddFeedbackTemplate> {
    let quantity = clamp_field(form.quantity.as_deref());
    let cart = state.shop().add_to_cart(form.product_id, quantity).await?;
    Ok(AddFeedbackTemplate {
        product_id: form.product_id,
        count: badge_count(&cart.items),
        revert_ms: ADD_FEEDBACK_REVERT_MS,
    })
}

/// Idle add-to-cart button fragment, fetched to revert the feedback label.
pub async fn add_button(Query(query): Query<AddButtonQuery>) -> AddButtonTemplate {
    AddButtonTemplate {
        product_id: query.product_id,
    }
}
