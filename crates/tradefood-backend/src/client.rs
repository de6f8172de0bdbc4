//! HTTP client for the TradeFood storefront REST backend.
//!
//! Wraps `reqwest` with backend-specific status handling and bearer-token
//! auth. Cart endpoints live here; catalog and login endpoints are in
//! [`crate::catalog`].
//!
//! This client performs no retries and no fallback: every failure is
//! returned to the caller, which decides what to do with it.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::Value;
use tradefood_core::config::DEFAULT_IMAGE_PLACEHOLDER_URL;
use tradefood_core::{AuthToken, Cart};

use crate::error::BackendError;
use crate::normalize::normalize_cart;
use crate::types::{CartLineRequest, CartPayload};

/// Client for the storefront backend.
///
/// Use [`StorefrontClient::new`] with the configured base URL; tests point it
/// at a wiremock server the same way.
pub struct StorefrontClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    image_placeholder: String,
}

impl StorefrontClient {
    /// Creates a client for the backend rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`BackendError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Ensure exactly one trailing slash so `Url::join` appends to the
        // base path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| BackendError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(BackendError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            image_placeholder: DEFAULT_IMAGE_PLACEHOLDER_URL.to_owned(),
        })
    }

    /// Sets the image URL substituted for products sent without one.
    #[must_use]
    pub fn with_image_placeholder(mut self, url: &str) -> Self {
        self.image_placeholder = url.to_owned();
        self
    }

    #[must_use]
    pub fn image_placeholder(&self) -> &str {
        &self.image_placeholder
    }

    /// Fetches the signed-in user's cart.
    ///
    /// A body that is not JSON, or that has no usable `items` array, is read
    /// as an empty cart.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Unauthorized`] if the token is rejected.
    /// - [`BackendError::NotFound`] / [`BackendError::UnexpectedStatus`] on
    ///   other non-2xx statuses.
    /// - [`BackendError::Http`] on network failure.
    pub async fn get_cart(&self, token: &AuthToken) -> Result<CartPayload, BackendError> {
        let url = self.endpoint("cart")?;
        let body = self
            .send(self.request(Method::GET, &url, Some(token)), &url)
            .await?;
        let value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str::<Value>(&body).unwrap_or_else(|e| {
                tracing::warn!(url = %url, error = %e, "cart response is not JSON; treating as empty");
                Value::Null
            })
        };
        Ok(CartPayload::from_value(&value))
    }

    /// Fetches the cart and normalizes it into a [`Cart`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_cart`].
    pub async fn fetch_cart(&self, token: &AuthToken) -> Result<Cart, BackendError> {
        let payload = self.get_cart(token).await?;
        Ok(normalize_cart(&payload, self.image_placeholder()))
    }

    /// Adds `quantity` units of a product to the remote cart.
    ///
    /// # Errors
    ///
    /// Any non-2xx status or network failure.
    pub async fn add_item(
        &self,
        token: &AuthToken,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), BackendError> {
        let url = self.endpoint("cart/add")?;
        let request = self
            .request(Method::POST, &url, Some(token))
            .json(&CartLineRequest {
                product_id,
                quantity,
            });
        self.send(request, &url).await.map(drop)
    }

    /// Sets the quantity of a product in the remote cart.
    ///
    /// # Errors
    ///
    /// Any non-2xx status or network failure.
    pub async fn update_quantity(
        &self,
        token: &AuthToken,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), BackendError> {
        let url = self.endpoint("cart/update")?;
        let request = self
            .request(Method::PUT, &url, Some(token))
            .json(&CartLineRequest {
                product_id,
                quantity,
            });
        self.send(request, &url).await.map(drop)
    }

    /// Removes a product from the remote cart.
    ///
    /// # Errors
    ///
    /// Any non-2xx status or network failure.
    pub async fn remove_item(&self, token: &AuthToken, product_id: &str) -> Result<(), BackendError> {
        let mut url = self.endpoint("cart/remove")?;
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_owned(),
            })?
            .push(product_id);
        let request = self.request(Method::DELETE, &url, Some(token));
        self.send(request, &url).await.map(drop)
    }

    /// Empties the remote cart.
    ///
    /// # Errors
    ///
    /// Any non-2xx status or network failure.
    pub async fn clear_cart(&self, token: &AuthToken) -> Result<(), BackendError> {
        let url = self.endpoint("cart/clear")?;
        let request = self.request(Method::DELETE, &url, Some(token));
        self.send(request, &url).await.map(drop)
    }

    /// Resolves a path relative to the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })
    }

    pub(crate) fn request(
        &self,
        method: Method,
        url: &Url,
        token: Option<&AuthToken>,
    ) -> RequestBuilder {
        let request = self
            .client
            .request(method, url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        match token {
            Some(t) => request.bearer_auth(t.as_str()),
            None => request,
        }
    }

    /// Sends the request and returns the body text of a 2xx response.
    pub(crate) async fn send(&self, request: RequestBuilder, url: &Url) -> Result<String, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(BackendError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
