//! Shop API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest` - the shop API is the source of
//!   truth, NO local sync, direct calls on every render cycle
//! - Cookie-persisting HTTP client for session affinity with the API
//! - CSRF token observed from `Set-Cookie` headers and replayed on every
//!   mutating request in the `X-CSRFToken` header
//! - In-memory caching via `moka` for product responses (5 minute TTL);
//!   cart responses are never cached (mutable state)
//!
//! # Example
//!
//! ```rust,ignore
//! use cartwheel_storefront::shop::{ShopApi, ShopClient};
//!
//! let client = ShopClient::new(&config.shop)?;
//!
//! // Read the cart, then propose a change
//! let cart = client.fetch_cart().await?;
//! let cart = client.add_to_cart(ProductId::new(1), Quantity::new(2)).await?;
//! ```

mod cache;
mod client;
mod csrf;
pub mod types;

pub use client::ShopClient;
pub use csrf::CsrfTokenSource;
pub use types::*;

use cartwheel_core::{Email, ProductId, Quantity};
use thiserror::Error;

/// Errors that can occur when talking to the shop API.
#[derive(Debug, Error)]
pub enum ShopError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("shop API returned {status}: {body}")]
    Status {
        /// HTTP status code of the response.
        status: reqwest::StatusCode,
        /// Leading part of the response body, for diagnostics.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Operations the storefront performs against the shop API.
///
/// Route flows are generic over this trait so they can be unit tested with
/// a scripted mock instead of a live API.
pub trait ShopApi {
    /// Fetch the current cart state.
    fn fetch_cart(&self) -> impl Future<Output = Result<Cart, ShopError>> + Send;

    /// Add a product to the cart, returning the updated cart.
    fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> impl Future<Output = Result<Cart, ShopError>> + Send;

    /// Set the quantity of a cart line, returning the updated cart.
    fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> impl Future<Output = Result<Cart, ShopError>> + Send;

    /// Remove a product from the cart, returning the updated cart.
    fn remove_from_cart(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Cart, ShopError>> + Send;

    /// Place an order from the cart contents.
    ///
    /// The outcome is tagged by the response payload, not the status line:
    /// the API reports application-level failure as `{detail}`.
    fn checkout(
        &self,
        email: Option<Email>,
    ) -> impl Future<Output = Result<CheckoutOutcome, ShopError>> + Send;

    /// List all products.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, ShopError>> + Send;

    /// Fetch a single product by id.
    fn get_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, ShopError>> + Send;
}
