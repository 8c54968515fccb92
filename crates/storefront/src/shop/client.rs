//! Shop API client implementation.
//!
//! Thin JSON-over-HTTP wrapper around `reqwest` with cookie persistence,
//! CSRF header replay, and a `moka` cache for product reads.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use cartwheel_core::{Email, ProductId, Quantity};

use crate::config::ShopConfig;
use crate::shop::cache::{CacheKey, CacheValue};
use crate::shop::csrf::{CSRF_HEADER, CsrfTokenSource};
use crate::shop::types::{
    Cart, CartLineRequest, CartRemoveRequest, CheckoutOutcome, CheckoutRequest, Product,
};
use crate::shop::{ShopApi, ShopError};

/// How much of an unexpected response body to keep for diagnostics.
const BODY_SNIPPET_LEN: usize = 200;

/// Client for the shop API.
///
/// Cheaply cloneable via `Arc`. Product reads are cached for 5 minutes;
/// cart and checkout calls always hit the API.
#[derive(Clone)]
pub struct ShopClient {
    inner: Arc<ShopClientInner>,
}

struct ShopClientInner {
    client: reqwest::Client,
    base_url: String,
    csrf: CsrfTokenSource,
    cache: Cache<CacheKey, CacheValue>,
}

impl ShopClient {
    /// Create a new shop API client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ShopConfig) -> Result<Self, ShopError> {
        // Cookie persistence stands in for the browser's same-origin
        // credentials: the API's session cookie rides along on every call.
        let client = reqwest::Client::builder().cookie_store(true).build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ShopClientInner {
                client,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                csrf: CsrfTokenSource::new(config.csrf_cookie.clone()),
                cache,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// Observe cookies and read the response body, keeping the status.
    async fn read_response(
        &self,
        response: reqwest::Response,
    ) -> Result<(StatusCode, String), ShopError> {
        self.inner.csrf.observe(response.headers());
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Execute a GET and parse the JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ShopError> {
        let response = self.inner.client.get(self.endpoint(path)).send().await?;
        let (status, body) = self.read_response(response).await?;
        check_status(status, &body)?;
        parse_json(&body)
    }

    /// Execute a POST carrying the CSRF header and parse the JSON response.
    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &impl Serialize,
    ) -> Result<T, ShopError> {
        let (status, body) = self.post_raw(path, request).await?;
        check_status(status, &body)?;
        parse_json(&body)
    }

    /// Execute a POST carrying the CSRF header, returning status and body.
    async fn post_raw(
        &self,
        path: &str,
        request: &impl Serialize,
    ) -> Result<(StatusCode, String), ShopError> {
        let response = self
            .inner
            .client
            .post(self.endpoint(path))
            // Empty when the cookie has never been seen; the API rejects
            // such requests.
            .header(CSRF_HEADER, self.inner.csrf.current())
            .json(request)
            .send()
            .await?;
        self.read_response(response).await
    }
}

/// Map a non-success status to an error carrying a body snippet.
fn check_status(status: StatusCode, body: &str) -> Result<(), ShopError> {
    if status.is_success() {
        return Ok(());
    }
    tracing::error!(
        status = %status,
        body = %snippet(body),
        "shop API returned non-success status"
    );
    Err(ShopError::Status {
        status,
        body: snippet(body),
    })
}

/// Parse a JSON body, logging the leading part of the payload on failure.
fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ShopError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %snippet(body),
            "failed to parse shop API response"
        );
        ShopError::Parse(e)
    })
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}

impl ShopApi for ShopClient {
    #[instrument(skip(self))]
    async fn fetch_cart(&self) -> Result<Cart, ShopError> {
        self.get_json("/api/cart/").await
    }

    #[instrument(skip(self))]
    async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<Cart, ShopError> {
        let request = CartLineRequest {
            product_id,
            quantity: quantity.get(),
        };
        self.post_json("/api/cart/add/", &request).await
    }

    #[instrument(skip(self))]
    async fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<Cart, ShopError> {
        let request = CartLineRequest {
            product_id,
            quantity: quantity.get(),
        };
        self.post_json("/api/cart/update/", &request).await
    }

    #[instrument(skip(self))]
    async fn remove_from_cart(&self, product_id: ProductId) -> Result<Cart, ShopError> {
        let request = CartRemoveRequest { product_id };
        self.post_json("/api/cart/remove/", &request).await
    }

    #[instrument(skip(self, email), fields(guest = email.is_some()))]
    async fn checkout(&self, email: Option<Email>) -> Result<CheckoutOutcome, ShopError> {
        let request = CheckoutRequest {
            email: email.map(Email::into_inner),
        };
        let (status, body) = self.post_raw("/api/checkout/", &request).await?;

        // The API signals checkout failure through the payload shape, so the
        // body is parsed for any status; an unparseable error page still
        // surfaces as a status error.
        match serde_json::from_str::<CheckoutOutcome>(&body) {
            Ok(outcome) => Ok(outcome),
            Err(_) if !status.is_success() => Err(ShopError::Status {
                status,
                body: snippet(&body),
            }),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %snippet(&body),
                    "failed to parse checkout response"
                );
                Err(ShopError::Parse(e))
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, ShopError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("cache hit for product list");
            return Ok(products);
        }

        let products: Vec<Product> = self.get_json("/api/products/").await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, ShopError> {
        let key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .get_json(&format!("/api/products/{id}/"))
            .await
            .map_err(|e| match e {
                ShopError::Status { status, .. } if status == StatusCode::NOT_FOUND => {
                    ShopError::NotFound(format!("Product not found: {id}"))
                }
                other => other,
            })?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}
