//! In-process stub of the shop API.
//!
//! Mirrors the contract the storefront consumes: a session cart behind
//! cookie/header CSRF protection, a checkout that answers with an order or
//! a `{detail}` rejection, and a read-only products API. Money arithmetic
//! happens here, server-side, with `rust_decimal` - clients only ever see
//! the formatted strings.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

/// Name of the CSRF cookie the stub issues on reads.
pub const CSRF_COOKIE: &str = "csrftoken";

/// The token value; a client that has never read anything has never seen it.
pub const CSRF_TOKEN: &str = "stub-csrf-token";

const CSRF_HEADER: &str = "X-CSRFToken";

/// A product the stub serves.
#[derive(Debug, Clone)]
pub struct StubProduct {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub image_url: Option<String>,
    pub category: Option<(i64, String)>,
}

/// An order the stub accepted, recorded for assertions.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub id: i64,
    pub email: Option<String>,
    pub total: String,
}

/// The default product seed used by most tests.
#[must_use]
pub fn seed_products() -> Vec<StubProduct> {
    vec![
        StubProduct {
            id: 1,
            name: "Cast iron teapot".to_string(),
            price: Decimal::new(1999, 2),
            description: "Holds a liter. Heavier than it looks.".to_string(),
            image_url: Some("/media/teapot.jpg".to_string()),
            category: Some((1, "Kitchen".to_string())),
        },
        StubProduct {
            id: 2,
            name: "Stoneware mug".to_string(),
            price: Decimal::new(550, 2),
            description: "Dishwasher safe.".to_string(),
            image_url: None,
            category: Some((1, "Kitchen".to_string())),
        },
        StubProduct {
            id: 3,
            name: "Serving tray".to_string(),
            price: Decimal::new(12000, 2),
            description: String::new(),
            image_url: Some("/media/tray.jpg".to_string()),
            category: None,
        },
    ]
}

/// A running stub server.
pub struct StubServer {
    /// Address the stub is listening on.
    pub addr: SocketAddr,
    state: StubState,
}

impl StubServer {
    /// Orders the stub has accepted so far.
    ///
    /// # Panics
    ///
    /// Panics if the stub state lock is poisoned.
    #[must_use]
    pub fn orders(&self) -> Vec<PlacedOrder> {
        self.state.inner.lock().expect("stub lock").orders.clone()
    }
}

#[derive(Clone)]
struct StubState {
    inner: Arc<Mutex<StubInner>>,
}

struct StubInner {
    products: Vec<StubProduct>,
    // product id -> quantity; BTreeMap keeps item order stable across renders
    cart: BTreeMap<i64, u32>,
    orders: Vec<PlacedOrder>,
    next_order_id: i64,
}

/// Spawn the stub on an ephemeral port.
///
/// The server task dies with the test's runtime.
///
/// # Panics
///
/// Panics if the listener cannot bind.
pub async fn spawn(products: Vec<StubProduct>) -> StubServer {
    let state = StubState {
        inner: Arc::new(Mutex::new(StubInner {
            products,
            cart: BTreeMap::new(),
            orders: Vec::new(),
            next_order_id: 1,
        })),
    };

    let app = Router::new()
        .route("/api/cart/", get(get_cart))
        .route("/api/cart/add/", post(add_to_cart))
        .route("/api/cart/update/", post(update_cart))
        .route("/api/cart/remove/", post(remove_from_cart))
        .route("/api/checkout/", post(checkout))
        .route("/api/products/", get(list_products))
        .route("/api/products/{id}/", get(get_product))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub serves");
    });

    StubServer { addr, state }
}

// =============================================================================
// Payloads
// =============================================================================

fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

fn cart_payload(inner: &StubInner) -> Value {
    let mut items = Vec::new();
    let mut total = Decimal::ZERO;

    for (&product_id, &quantity) in &inner.cart {
        let Some(product) = inner.products.iter().find(|p| p.id == product_id) else {
            continue;
        };
        let subtotal = product.price * Decimal::from(quantity);
        total += subtotal;
        items.push(json!({
            "id": product.id,
            "name": product.name,
            "price": money(product.price),
            "image_url": product.image_url,
            "quantity": quantity,
            "subtotal": money(subtotal),
        }));
    }

    json!({ "items": items, "total": money(total) })
}

fn product_payload(product: &StubProduct) -> Value {
    json!({
        "id": product.id,
        "name": product.name,
        "price": money(product.price),
        "description": product.description,
        "image_url": product.image_url,
        "category": product
            .category
            .as_ref()
            .map(|(id, name)| json!({"id": id, "name": name})),
    })
}

/// Attach the CSRF cookie, as the API does on every read.
fn with_csrf_cookie(body: Json<Value>) -> Response {
    (
        [(
            header::SET_COOKIE,
            format!("{CSRF_COOKIE}={CSRF_TOKEN}; Path=/"),
        )],
        body,
    )
        .into_response()
}

fn check_csrf(headers: &HeaderMap) -> Result<(), Response> {
    let token = headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if token == CSRF_TOKEN {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(json!({"detail": "CSRF verification failed."})),
        )
            .into_response())
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Debug, Deserialize)]
struct LineRequest {
    product_id: i64,
    #[serde(default)]
    quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RemoveRequest {
    product_id: i64,
}

#[derive(Debug, Deserialize)]
struct CheckoutRequest {
    #[serde(default)]
    email: Option<String>,
}

async fn get_cart(State(state): State<StubState>) -> Response {
    let inner = state.inner.lock().expect("stub lock");
    with_csrf_cookie(Json(cart_payload(&inner)))
}

async fn add_to_cart(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(request): Json<LineRequest>,
) -> Response {
    if let Err(response) = check_csrf(&headers) {
        return response;
    }
    let mut inner = state.inner.lock().expect("stub lock");
    let quantity = request.quantity.unwrap_or(1);
    *inner.cart.entry(request.product_id).or_insert(0) += quantity;
    Json(cart_payload(&inner)).into_response()
}

async fn update_cart(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(request): Json<LineRequest>,
) -> Response {
    if let Err(response) = check_csrf(&headers) {
        return response;
    }
    let mut inner = state.inner.lock().expect("stub lock");
    let quantity = request.quantity.unwrap_or(1);
    if quantity == 0 {
        inner.cart.remove(&request.product_id);
    } else {
        inner.cart.insert(request.product_id, quantity);
    }
    Json(cart_payload(&inner)).into_response()
}

async fn remove_from_cart(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(request): Json<RemoveRequest>,
) -> Response {
    if let Err(response) = check_csrf(&headers) {
        return response;
    }
    let mut inner = state.inner.lock().expect("stub lock");
    inner.cart.remove(&request.product_id);
    Json(cart_payload(&inner)).into_response()
}

async fn checkout(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(request): Json<CheckoutRequest>,
) -> Response {
    if let Err(response) = check_csrf(&headers) {
        return response;
    }
    let mut inner = state.inner.lock().expect("stub lock");

    if inner.cart.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Cart is empty."})),
        )
            .into_response();
    }

    let total: Decimal = inner
        .cart
        .iter()
        .filter_map(|(product_id, quantity)| {
            inner
                .products
                .iter()
                .find(|p| p.id == *product_id)
                .map(|p| p.price * Decimal::from(*quantity))
        })
        .sum();

    let id = inner.next_order_id;
    inner.next_order_id += 1;
    inner.orders.push(PlacedOrder {
        id,
        email: request.email.clone(),
        total: money(total),
    });
    inner.cart.clear();

    (
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "email": request.email,
            "total": money(total),
            "paid": false,
        })),
    )
        .into_response()
}

async fn list_products(State(state): State<StubState>) -> Response {
    let inner = state.inner.lock().expect("stub lock");
    let products: Vec<Value> = inner.products.iter().map(product_payload).collect();
    with_csrf_cookie(Json(Value::Array(products)))
}

async fn get_product(State(state): State<StubState>, Path(id): Path<i64>) -> Response {
    let inner = state.inner.lock().expect("stub lock");
    match inner.products.iter().find(|p| p.id == id) {
        Some(product) => with_csrf_cookie(Json(product_payload(product))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Not found."})),
        )
            .into_response(),
    }
}
