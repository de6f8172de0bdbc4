//! Cart command handlers.

use std::time::Duration;

use clap::Subcommand;
use tokio::sync::mpsc;
use tradefood_cart::{spawn_token_watcher, SharedCart, SyncState, TokenStore};
use tradefood_core::{format_eur, AppConfig, Cart};

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        /// Product identifier
        id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove {
        /// Product identifier
        id: String,
    },
    /// Set a product's quantity; zero or below removes it
    Update {
        /// Product identifier
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Print the cart whenever the session changes, until interrupted
    Watch {
        /// Seconds between token file checks
        #[arg(long, default_value_t = 2)]
        interval_secs: u64,
    },
}

pub(crate) async fn run_cart(config: &AppConfig, command: CartCommands) -> anyhow::Result<()> {
    if let CartCommands::Watch { interval_secs } = command {
        return run_cart_watch(config, interval_secs).await;
    }

    let mut cart = crate::open_cart(config).await?;
    match command {
        CartCommands::Show | CartCommands::Watch { .. } => {}
        CartCommands::Add { id, quantity } => {
            let product = cart
                .backend()
                .get_product(&id)
                .await
                .map_err(|e| anyhow::anyhow!("cannot add product {id}: {e}"))?;
            cart.add_item(product, quantity).await;
        }
        CartCommands::Remove { id } => cart.remove_item(&id).await,
        CartCommands::Update { id, quantity } => cart.update_quantity(&id, quantity).await,
        CartCommands::Clear => cart.clear_cart().await,
    }

    print_cart(cart.cart(), cart.state(), cart.auth_rejected());
    Ok(())
}

async fn run_cart_watch(config: &AppConfig, interval_secs: u64) -> anyhow::Result<()> {
    let shared = SharedCart::new(crate::open_cart(config).await?);
    {
        let cart = shared.lock().await;
        print_cart(cart.cart(), cart.state(), cart.auth_rejected());
    }

    let (tx, rx) = mpsc::channel(8);
    let watcher = spawn_token_watcher(
        TokenStore::new(config.token_path()),
        Duration::from_secs(interval_secs.max(1)),
        tx,
    );
    let listener = shared.spawn_session_listener(rx);
    let mut states = shared.lock().await.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *states.borrow_and_update();
                if state != SyncState::Syncing {
                    let cart = shared.lock().await;
                    print_cart(cart.cart(), state, cart.auth_rejected());
                }
            }
        }
    }

    watcher.abort();
    listener.abort();
    Ok(())
}

pub(crate) fn print_cart(cart: &Cart, state: SyncState, auth_rejected: bool) {
    if auth_rejected {
        println!("warning: session expired; run `tradefood login` (showing local copy)");
    } else if state == SyncState::Degraded {
        println!("warning: backend unreachable; showing local copy");
    }
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }
    println!("{:<12}{:>5}  {:<14}{:<14}TITLE", "ID", "QTY", "UNIT", "LINE");
    for item in cart.items() {
        println!(
            "{:<12}{:>5}  {:<14}{:<14}{}",
            item.product_id(),
            item.quantity(),
            crate::catalog::price_label(&item.product),
            format_eur(item.line_total()),
            item.product.title
        );
    }
    println!(
        "{} item(s), total {}",
        cart.item_count(),
        format_eur(cart.total())
    );
}
