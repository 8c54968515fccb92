//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod products;

use cartwheel_core::EmailError;
use cartwheel_storefront::config::ConfigError;
use cartwheel_storefront::shop::{ShopClient, ShopError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Client configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The shop API call failed.
    #[error(transparent)]
    Shop(#[from] ShopError),

    /// The email argument did not parse.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The API rejected the checkout.
    #[error("Checkout rejected: {0}")]
    CheckoutRejected(String),
}

/// Build a shop API client from the environment.
pub(crate) fn client() -> Result<ShopClient, CommandError> {
    dotenvy::dotenv().ok();
    let config = cartwheel_storefront::config::ShopConfig::from_env()?;
    Ok(ShopClient::new(&config)?)
}
