//! Catalog and login endpoints for the storefront backend client.

use reqwest::Method;
use serde_json::Value;
use tradefood_core::{AuthToken, Category, Product};

use crate::client::StorefrontClient;
use crate::error::BackendError;
use crate::normalize::{normalize_category, normalize_product};
use crate::types::{list_records, LoginRequest, ProductQuery};

impl StorefrontClient {
    /// Lists catalog products, optionally filtered by category or search text.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Http`] on network failure.
    /// - [`BackendError::NotFound`] / [`BackendError::UnexpectedStatus`] on non-2xx.
    /// - [`BackendError::Deserialize`] if the body is not JSON.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, BackendError> {
        let mut url = self.endpoint("products")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(category) = query.category.as_deref() {
                pairs.append_pair("category", category);
            }
            if let Some(search) = query.search.as_deref() {
                pairs.append_pair("search", search);
            }
        }
        // An empty query leaves a dangling `?`.
        if url.query() == Some("") {
            url.set_query(None);
        }

        let body = self.get_json(&url, "products list").await?;
        Ok(list_records(&body, &["products"])
            .iter()
            .map(|raw| normalize_product(raw, self.image_placeholder()))
            .collect())
    }

    /// Fetches a single product by identifier.
    ///
    /// The record may be returned bare or wrapped under `product`/`data`.
    ///
    /// # Errors
    ///
    /// - [`BackendError::NotFound`] if the product does not exist.
    /// - [`BackendError::Http`] / [`BackendError::UnexpectedStatus`] otherwise.
    /// - [`BackendError::Deserialize`] if the body is not JSON.
    pub async fn get_product(&self, product_id: &str) -> Result<Product, BackendError> {
        let mut url = self.endpoint("products")?;
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_owned(),
            })?
            .push(product_id);

        let body = self
            .get_json(&url, &format!("product(id={product_id})"))
            .await?;
        let record = ["product", "data"]
            .iter()
            .find_map(|k| body.get(*k).filter(|v| v.is_object()))
            .unwrap_or(&body);

        let mut product = normalize_product(record, self.image_placeholder());
        if product.id.is_empty() {
            product.id = product_id.to_owned();
        }
        Ok(product)
    }

    /// Lists catalog categories.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_products`].
    pub async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        let url = self.endpoint("categories")?;
        let body = self.get_json(&url, "categories list").await?;
        Ok(list_records(&body, &["categories"])
            .iter()
            .map(normalize_category)
            .filter(|c| !c.id.is_empty())
            .collect())
    }

    /// Exchanges credentials for a bearer token.
    ///
    /// Accepts `{"token": ...}`, `{"access_token": ...}`, or either nested
    /// under `data`.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Unauthorized`] on rejected credentials.
    /// - [`BackendError::Deserialize`] if the body is not JSON.
    /// - [`BackendError::MissingToken`] if no token field is present.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken, BackendError> {
        let url = self.endpoint("auth/login")?;
        let request = self
            .request(Method::POST, &url, None)
            .json(&LoginRequest { email, password });
        let text = self.send(request, &url).await?;
        let body: Value = serde_json::from_str(&text).map_err(|e| BackendError::Deserialize {
            context: "login response".to_owned(),
            source: e,
        })?;

        let scopes = [Some(&body), body.get("data")];
        scopes
            .iter()
            .flatten()
            .find_map(|scope| {
                ["token", "access_token", "accessToken"]
                    .iter()
                    .find_map(|k| scope.get(*k).and_then(Value::as_str))
            })
            .and_then(AuthToken::new)
            .ok_or_else(|| BackendError::MissingToken {
                url: url.to_string(),
            })
    }

    async fn get_json(&self, url: &reqwest::Url, context: &str) -> Result<Value, BackendError> {
        let text = self
            .send(self.request(Method::GET, url, None), url)
            .await?;
        serde_json::from_str(&text).map_err(|e| BackendError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
