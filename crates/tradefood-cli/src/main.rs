mod cart;
mod catalog;
mod checkout;
mod session;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tradefood_backend::StorefrontClient;
use tradefood_cart::{CartSync, JsonFileStore, TokenStore};
use tradefood_core::{AppConfig, SessionContext};

use crate::cart::CartCommands;
use crate::catalog::ProductsCommands;
use crate::checkout::CheckoutCommands;

#[derive(Debug, Parser)]
#[command(name = "tradefood")]
#[command(about = "TradeFood storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        command: ProductsCommands,
    },
    /// List product categories
    Categories,
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        /// Read from `TRADEFOOD_PASSWORD` when omitted
        #[arg(long, env = "TRADEFOOD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and clear the local cart
    Logout,
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Complete checkout after payment confirmation
    Checkout {
        #[command(subcommand)]
        command: CheckoutCommands,
    },
}

/// Cart module over the HTTP backend and the on-disk store.
pub(crate) type CliCart = CartSync<StorefrontClient, JsonFileStore>;

pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<StorefrontClient> {
    let client = StorefrontClient::new(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build storefront client: {e}"))?;
    Ok(client.with_image_placeholder(&config.image_placeholder_url))
}

/// Cart for the session stored on disk, not yet loaded.
pub(crate) fn new_cart(config: &AppConfig) -> anyhow::Result<CliCart> {
    let session = SessionContext::from_token(TokenStore::new(config.token_path()).read());
    Ok(CartSync::new(
        build_client(config)?,
        JsonFileStore::new(config.cart_path()),
        session,
    ))
}

/// Cart for the session stored on disk, loaded from its source of truth.
pub(crate) async fn open_cart(config: &AppConfig) -> anyhow::Result<CliCart> {
    let mut cart = new_cart(config)?;
    cart.initialize().await;
    Ok(cart)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tradefood_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, api = %config.api_base_url, "configuration loaded");

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Products { command }) => catalog::run_products(&config, command).await?,
        Some(Commands::Categories) => catalog::run_categories(&config).await?,
        Some(Commands::Login { email, password }) => {
            session::run_login(&config, &email, &password).await?;
        }
        Some(Commands::Logout) => session::run_logout(&config).await?,
        Some(Commands::Cart { command }) => cart::run_cart(&config, command).await?,
        Some(Commands::Checkout { command }) => checkout::run_checkout(&config, command).await?,
        None => println!("tradefood: run with --help to list commands"),
    }

    Ok(())
}
