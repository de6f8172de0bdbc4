//! Cloneable handle that queues cart operations.
//!
//! [`CartSync`] mutations take `&mut self`; [`SharedCart`] puts one instance
//! behind an async mutex so concurrent callers run one after another instead
//! of interleaving remote round-trips and losing updates.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tradefood_core::{Cart, CartMutation, SessionEvent};

use crate::backend::CartBackend;
use crate::store::CartStore;
use crate::sync::{CartSync, SyncState};

pub struct SharedCart<B, S> {
    inner: Arc<Mutex<CartSync<B, S>>>,
    state: watch::Receiver<SyncState>,
}

impl<B, S> Clone for SharedCart<B, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            state: self.state.clone(),
        }
    }
}

impl<B, S> SharedCart<B, S>
where
    B: CartBackend + 'static,
    S: CartStore + 'static,
{
    #[must_use]
    pub fn new(sync: CartSync<B, S>) -> Self {
        let state = sync.subscribe();
        Self {
            inner: Arc::new(Mutex::new(sync)),
            state,
        }
    }

    /// Waits for exclusive access to the underlying module.
    pub async fn lock(&self) -> MutexGuard<'_, CartSync<B, S>> {
        self.inner.lock().await
    }

    pub async fn apply(&self, mutation: CartMutation) {
        self.inner.lock().await.apply(mutation).await;
    }

    pub async fn handle_session_event(&self, event: SessionEvent) {
        self.inner.lock().await.handle_session_event(event).await;
    }

    /// Copy of the cart once all queued operations ahead of this call finish.
    pub async fn snapshot(&self) -> Cart {
        self.inner.lock().await.cart().clone()
    }

    /// Current state without waiting for the lock.
    #[must_use]
    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state() == SyncState::Syncing
    }

    /// Forwards session events from `events` until the sender side closes.
    pub fn spawn_session_listener(&self, mut events: mpsc::Receiver<SessionEvent>) -> JoinHandle<()> {
        let cart = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                tracing::debug!(?event, "session event received");
                cart.handle_session_event(event).await;
            }
        })
    }
}
