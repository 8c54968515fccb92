//! Cartwheel CLI - smoke-test the shop API from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! cw-cli cart show
//!
//! # Add product 3, quantity 2
//! cw-cli cart add 3 -q 2
//!
//! # Set product 3's quantity
//! cw-cli cart update 3 -q 5
//!
//! # Remove product 3
//! cw-cli cart remove 3
//!
//! # Place an order
//! cw-cli checkout -e you@example.com
//!
//! # Browse products
//! cw-cli products list
//! cw-cli products show 3
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_API_BASE_URL` - Base URL of the shop API
//! - `SHOP_CSRF_COOKIE` - CSRF cookie name (default: csrftoken)

#![cfg_attr(not(test), forbid(unsafe_code))]
// A CLI's job is to print to stdout
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cw-cli")]
#[command(author, version, about = "Cartwheel CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Place an order from the cart contents
    Checkout {
        /// Guest email address
        #[arg(short, long)]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart contents
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: i64,

        /// Quantity to add (minimum 1)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a cart line's quantity
    Update {
        /// Product id
        product_id: i64,

        /// New quantity (minimum 1)
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        product_id: i64,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all products
    List,
    /// Show a single product
    Show {
        /// Product id
        product_id: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show().await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(product_id, quantity).await?,
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(product_id, quantity).await?,
            CartAction::Remove { product_id } => commands::cart::remove(product_id).await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list().await?,
            ProductsAction::Show { product_id } => commands::products::show(product_id).await?,
        },
        Commands::Checkout { email } => {
            commands::checkout::place_order(email.as_deref()).await?;
        }
    }
    Ok(())
}
