//! Cart synchronization: remote-first with local fallback.
//!
//! With a token in the [`SessionContext`] the backend is the source of
//! truth. Every mutation is sent remotely, then the full cart is fetched back
//! and written through to the local store. When either call fails the same
//! mutation is applied to the local copy instead and the module reports
//! [`SyncState::Degraded`] until the next successful round-trip.
//!
//! Without a token the local store is the source of truth and no remote call
//! is made.
//!
//! Updates are pessimistic: while a remote round-trip is in flight the
//! in-memory cart is left untouched and the state is [`SyncState::Syncing`].

use rust_decimal::Decimal;
use tokio::sync::watch;
use tradefood_backend::BackendError;
use tradefood_core::{
    clamp_quantity, AuthToken, Cart, CartItem, CartMutation, Product, SessionContext,
    SessionEvent, SessionMode,
};

use crate::backend::CartBackend;
use crate::store::CartStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// A remote round-trip is in flight.
    Syncing,
    /// The in-memory cart matches its source of truth.
    Synced,
    /// The last remote round-trip failed; the in-memory cart is a local
    /// fallback and may diverge from the server.
    Degraded,
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncState::Syncing => write!(f, "syncing"),
            SyncState::Synced => write!(f, "synced"),
            SyncState::Degraded => write!(f, "degraded"),
        }
    }
}

pub struct CartSync<B, S> {
    backend: B,
    store: S,
    session: SessionContext,
    cart: Cart,
    state: watch::Sender<SyncState>,
    auth_rejected: bool,
}

impl<B: CartBackend, S: CartStore> CartSync<B, S> {
    /// Creates the module with an empty cart. Call [`Self::initialize`] to
    /// load from the session's source of truth.
    #[must_use]
    pub fn new(backend: B, store: S, session: SessionContext) -> Self {
        let (state, _) = watch::channel(SyncState::Synced);
        Self {
            backend,
            store,
            session,
            cart: Cart::new(),
            state,
            auth_rejected: false,
        }
    }

    /// Loads the cart from the backend when authenticated, or from the local
    /// store otherwise.
    ///
    /// A failed remote fetch falls back to the locally stored cart.
    pub async fn initialize(&mut self) {
        let Some(token) = self.session.token().cloned() else {
            self.cart = self.store.load();
            self.auth_rejected = false;
            self.set_state(SyncState::Synced);
            tracing::debug!(items = self.cart.len(), "loaded anonymous cart from local store");
            return;
        };

        self.set_state(SyncState::Syncing);
        match self.backend.fetch_cart(&token).await {
            Ok(cart) => {
                self.replace_from_remote(cart);
                tracing::debug!(items = self.cart.len(), "loaded remote cart");
            }
            Err(e) => {
                self.cart = self.store.load();
                self.record_remote_failure(&e);
                tracing::warn!(
                    error = %e,
                    items = self.cart.len(),
                    token_rejected = self.auth_rejected,
                    "remote cart fetch failed; using local copy"
                );
            }
        }
    }

    /// Reacts to an external session signal.
    ///
    /// `TokenChanged` adopts the new token and re-initializes. `Logout` drops
    /// the token and clears both the in-memory and the stored cart; the
    /// remote cart is left alone.
    pub async fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::TokenChanged(token) => {
                self.session.set_token(token);
                tracing::info!(mode = %self.session.mode(), "session changed; reloading cart");
                self.initialize().await;
            }
            SessionEvent::Logout => {
                self.session.set_token(None);
                self.auth_rejected = false;
                self.cart.clear();
                self.store.clear();
                self.set_state(SyncState::Synced);
                tracing::info!("logged out; cart cleared");
            }
        }
    }

    /// Applies a mutation against the session's source of truth.
    ///
    /// Never fails: remote errors are logged and the mutation is applied
    /// locally instead, leaving the module [`SyncState::Degraded`].
    pub async fn apply(&mut self, mutation: CartMutation) {
        let mutation = mutation.canonical();
        if matches!(mutation, CartMutation::Add { quantity: 0, .. }) {
            return;
        }

        let Some(token) = self.session.token().cloned() else {
            self.apply_locally(&mutation);
            self.set_state(SyncState::Synced);
            return;
        };

        self.set_state(SyncState::Syncing);
        let outcome = match self.push(&token, &mutation).await {
            Ok(()) => self
                .backend
                .fetch_cart(&token)
                .await
                .map_err(|e| ("refetch", e)),
            Err(e) => Err(("mutation", e)),
        };

        match outcome {
            Ok(cart) => self.replace_from_remote(cart),
            Err((stage, e)) => {
                self.record_remote_failure(&e);
                if e.is_auth_failure() {
                    tracing::warn!(
                        mutation = mutation.kind(),
                        stage,
                        error = %e,
                        "session token rejected; applying locally until the next login"
                    );
                } else {
                    tracing::warn!(
                        mutation = mutation.kind(),
                        stage,
                        error = %e,
                        "remote cart update failed; applying locally"
                    );
                }
                self.apply_locally(&mutation);
            }
        }
    }

    pub async fn add_item(&mut self, product: Product, quantity: u32) {
        self.apply(CartMutation::Add { product, quantity }).await;
    }

    pub async fn remove_item(&mut self, product_id: &str) {
        self.apply(CartMutation::Remove {
            product_id: product_id.to_owned(),
        })
        .await;
    }

    /// Sets a product's quantity. Zero or below removes the product.
    pub async fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id).await;
            return;
        }
        self.apply(CartMutation::UpdateQuantity {
            product_id: product_id.to_owned(),
            quantity,
        })
        .await;
    }

    pub async fn clear_cart(&mut self) {
        self.apply(CartMutation::Clear).await;
    }

    async fn push(&self, token: &AuthToken, mutation: &CartMutation) -> Result<(), BackendError> {
        match mutation {
            CartMutation::Add { product, quantity } => {
                self.backend.add_item(token, &product.id, *quantity).await
            }
            CartMutation::Remove { product_id } => {
                self.backend.remove_item(token, product_id).await
            }
            CartMutation::UpdateQuantity {
                product_id,
                quantity,
            } => {
                self.backend
                    .update_quantity(token, product_id, clamp_quantity(*quantity))
                    .await
            }
            CartMutation::Clear => self.backend.clear_cart(token).await,
        }
    }

    fn apply_locally(&mut self, mutation: &CartMutation) {
        self.cart.apply(mutation);
        self.store.save(&self.cart);
    }

    fn replace_from_remote(&mut self, cart: Cart) {
        self.cart = cart;
        self.store.save(&self.cart);
        self.auth_rejected = false;
        self.set_state(SyncState::Synced);
    }

    fn record_remote_failure(&mut self, error: &BackendError) {
        self.auth_rejected = error.is_auth_failure();
        self.set_state(SyncState::Degraded);
    }

    fn set_state(&self, state: SyncState) {
        self.state.send_replace(state);
    }
}

impl<B, S> CartSync<B, S> {
    /// The remote backend, for calls outside cart synchronization.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    #[must_use]
    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    /// `true` while a remote round-trip is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state() == SyncState::Syncing
    }

    /// `true` when the last remote failure was the backend rejecting the
    /// session token. Cleared by the next successful round-trip or a
    /// session change.
    #[must_use]
    pub fn auth_rejected(&self) -> bool {
        self.auth_rejected
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.session.mode()
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Watches state transitions, including `Syncing` while a caller holds
    /// the module mid-mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
