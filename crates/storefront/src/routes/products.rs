//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use cartwheel_core::ProductId;

use crate::error::Result;
use crate::filters;
use crate::shop::ShopApi;
use crate::state::AppState;
use crate::view::ProductView;

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
}

/// Display product listing page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<ProductsIndexTemplate> {
    let products = state.shop().list_products().await?;
    Ok(ProductsIndexTemplate {
        products: products.iter().map(ProductView::from).collect(),
    })
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<ProductShowTemplate> {
    let product = state.shop().get_product(id).await?;
    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
    })
}
