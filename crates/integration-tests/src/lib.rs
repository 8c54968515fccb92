//! Integration tests for Cartwheel.
//!
//! The tests in `tests/` drive the real [`ShopClient`] against an
//! in-process stub of the shop API ([`stub`]), covering the full request
//! path: cookie persistence, CSRF header replay, wire parsing, and the
//! mutate-then-refresh contract.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartwheel-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod stub;

use cartwheel_storefront::config::ShopConfig;
use cartwheel_storefront::shop::ShopClient;
use url::Url;

use stub::StubServer;

/// A running stub API plus a client pointed at it.
pub struct TestContext {
    /// The stub shop API.
    pub stub: StubServer,
    /// A fresh client with an empty cookie jar.
    pub client: ShopClient,
}

impl TestContext {
    /// Spawn a stub with the default product seed and connect a client.
    ///
    /// # Panics
    ///
    /// Panics if the stub cannot bind or the client cannot be built -
    /// either is a broken test environment.
    pub async fn new() -> Self {
        let stub = stub::spawn(stub::seed_products()).await;
        let client = connect(&stub);
        Self { stub, client }
    }

    /// Build another client against the same stub, with its own cookie jar.
    #[must_use]
    pub fn fresh_client(&self) -> ShopClient {
        connect(&self.stub)
    }

    /// The stub's base URL.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.stub.addr)
    }
}

fn connect(stub: &StubServer) -> ShopClient {
    let config = ShopConfig {
        api_base_url: Url::parse(&format!("http://{}", stub.addr))
            .expect("stub address is a valid URL"),
        csrf_cookie: stub::CSRF_COOKIE.to_string(),
    };
    ShopClient::new(&config).expect("client builds")
}
