//! Remote cart seam used by [`crate::CartSync`].

use std::future::Future;

use tradefood_backend::{BackendError, StorefrontClient};
use tradefood_core::{AuthToken, Cart};

/// Remote cart operations. Every call may fail; implementations do not retry
/// and do not fall back.
pub trait CartBackend: Send + Sync {
    /// Fetches and normalizes the full remote cart.
    fn fetch_cart(&self, token: &AuthToken)
        -> impl Future<Output = Result<Cart, BackendError>> + Send;

    fn add_item(
        &self,
        token: &AuthToken,
        product_id: &str,
        quantity: u32,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn remove_item(
        &self,
        token: &AuthToken,
        product_id: &str,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn update_quantity(
        &self,
        token: &AuthToken,
        product_id: &str,
        quantity: u32,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn clear_cart(&self, token: &AuthToken)
        -> impl Future<Output = Result<(), BackendError>> + Send;
}

impl CartBackend for StorefrontClient {
    async fn fetch_cart(&self, token: &AuthToken) -> Result<Cart, BackendError> {
        StorefrontClient::fetch_cart(self, token).await
    }

    async fn add_item(
        &self,
        token: &AuthToken,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), BackendError> {
        StorefrontClient::add_item(self, token, product_id, quantity).await
    }

    async fn remove_item(&self, token: &AuthToken, product_id: &str) -> Result<(), BackendError> {
        StorefrontClient::remove_item(self, token, product_id).await
    }

    async fn update_quantity(
        &self,
        token: &AuthToken,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), BackendError> {
        StorefrontClient::update_quantity(self, token, product_id, quantity).await
    }

    async fn clear_cart(&self, token: &AuthToken) -> Result<(), BackendError> {
        StorefrontClient::clear_cart(self, token).await
    }
}
