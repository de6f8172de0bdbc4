//! Login and logout.
//!
//! The token file is the session. Login writes it and pulls the remote cart
//! into the local store; logout removes it and clears the local cart.

use tradefood_cart::TokenStore;
use tradefood_core::{format_eur, AppConfig, SessionEvent};

pub(crate) async fn run_login(config: &AppConfig, email: &str, password: &str) -> anyhow::Result<()> {
    let client = crate::build_client(config)?;
    let token = client.login(email, password).await?;

    let tokens = TokenStore::new(config.token_path());
    tokens.write(&token)?;
    tracing::info!(email, "signed in");

    // Pulls the remote cart into the local store.
    let cart = crate::open_cart(config).await?;
    println!(
        "signed in as {email}; cart has {} item(s), {}",
        cart.item_count(),
        format_eur(cart.total())
    );
    Ok(())
}

pub(crate) async fn run_logout(config: &AppConfig) -> anyhow::Result<()> {
    let mut cart = crate::new_cart(config)?;
    TokenStore::new(config.token_path()).remove()?;
    cart.handle_session_event(SessionEvent::Logout).await;
    println!("signed out; local cart cleared");
    Ok(())
}
