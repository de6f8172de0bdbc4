//! Loosely-typed backend payloads.
//!
//! The storefront backend is not consistent about field names or envelopes:
//!
//! ### Cart
//! `GET /cart` returns `{"items": [{"product": {...}, "quantity": 2}, ...]}`.
//! `items` has been observed as `null`, missing entirely, or absent because the
//! whole body is empty; all of those mean an empty cart. Quantities arrive as
//! numbers or numeric strings. Some lines carry the product fields inline
//! (`product_id`, `nom`, `prix_ttc`) instead of under `product`.
//!
//! ### Lists
//! Catalog endpoints return either a bare JSON array or an object wrapping the
//! array under `products`, `categories`, `data`, or `items`.
//!
//! Nothing here fails: shapes that don't match are read as empty.

use serde::Serialize;
use serde_json::Value;

/// One raw `{product, quantity}` line from `GET /cart`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCartLine {
    /// Product record as sent by the backend; normalized later.
    pub product: Value,
    pub quantity: i64,
}

/// Parsed body of `GET /cart`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartPayload {
    pub lines: Vec<RawCartLine>,
}

impl CartPayload {
    /// Reads the cart lines out of a response body.
    ///
    /// Missing, `null`, or non-array `items` yields an empty payload.
    /// Entries that are not JSON objects are skipped.
    #[must_use]
    pub fn from_value(body: &Value) -> Self {
        let Some(items) = body.get("items").and_then(Value::as_array) else {
            if body.get("items").is_some_and(|v| !v.is_null()) {
                tracing::warn!("cart payload `items` is not an array; treating as empty");
            }
            return Self::default();
        };

        let lines = items
            .iter()
            .filter(|line| line.is_object())
            .map(|line| {
                let product = line
                    .get("product")
                    .filter(|p| p.is_object())
                    .unwrap_or(line)
                    .clone();
                let quantity = ["quantity", "quantite", "qty"]
                    .iter()
                    .find_map(|k| line.get(*k).and_then(read_i64))
                    .unwrap_or(1);
                RawCartLine { product, quantity }
            })
            .collect();

        Self { lines }
    }
}

/// Extracts the list of records from a catalog response.
#[must_use]
pub fn list_records<'a>(body: &'a Value, keys: &[&str]) -> &'a [Value] {
    if let Some(arr) = body.as_array() {
        return arr;
    }
    keys.iter()
        .chain(["data", "items"].iter())
        .find_map(|k| body.get(*k).and_then(Value::as_array))
        .map_or(&[][..], Vec::as_slice)
}

/// Reads an integer from a JSON number or a numeric string.
pub(crate) fn read_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(truncate_f64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_f64(f: f64) -> i64 {
    f.trunc() as i64
}

/// Body of `POST /cart/add` and `PUT /cart/update`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLineRequest<'a> {
    pub product_id: &'a str,
    pub quantity: u32,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Filters accepted by `GET /products`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}
