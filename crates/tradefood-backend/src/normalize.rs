//! Normalization from loosely-typed backend records to [`tradefood_core`] types.
//!
//! The backend mixes its own French field names (`nom`, `prix_ttc`,
//! `categorie`) with generic English ones depending on the endpoint. Each
//! canonical field is resolved by trying backend-native keys first and generic
//! keys after. Every function here is total: a missing or mistyped field is
//! replaced by a default, never reported as an error.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use tradefood_core::{Cart, Category, Product};

use crate::types::{read_i64, CartPayload};

const ID_KEYS: &[&str] = &["id", "_id", "product_id", "productId"];
const TITLE_KEYS: &[&str] = &["nom", "name", "title"];
const DESCRIPTION_KEYS: &[&str] = &["description", "description_short"];
const PRICE_KEYS: &[&str] = &["prix_ttc", "price_ttc", "price_tax_incl", "price"];
const ORIGINAL_PRICE_KEYS: &[&str] = &[
    "prix_barre",
    "original_price",
    "originalPrice",
    "compare_at_price",
];
const IMAGE_KEYS: &[&str] = &["image_url", "imageUrl", "image"];
const CATEGORY_KEYS: &[&str] = &["categorie", "category", "category_id", "categoryId"];
const RATING_KEYS: &[&str] = &["note", "rating"];
const REVIEW_COUNT_KEYS: &[&str] = &["nb_avis", "review_count", "reviewCount", "reviews"];
const FEATURED_KEYS: &[&str] = &["vedette", "featured", "is_featured"];
const UNAVAILABLE_FLAG_KEYS: &[&str] = &["archived", "is_archived", "declined"];
const UNAVAILABLE_STATUSES: &[&str] = &["archived", "declined"];

/// Normalizes a backend product record into a [`Product`].
///
/// `placeholder_image` is used when the record carries no usable image.
#[must_use]
pub fn normalize_product(raw: &Value, placeholder_image: &str) -> Product {
    let images = read_images(raw);
    let image = IMAGE_KEYS
        .iter()
        .find_map(|k| raw.get(*k).and_then(image_url))
        .or_else(|| images.first().cloned())
        .unwrap_or_else(|| placeholder_image.to_owned());
    let images = if images.is_empty() {
        vec![image.clone()]
    } else {
        images
    };

    Product {
        id: first_string(raw, ID_KEYS).unwrap_or_default(),
        title: first_string(raw, TITLE_KEYS).unwrap_or_default(),
        description: first_string(raw, DESCRIPTION_KEYS).unwrap_or_default(),
        price: first_decimal(raw, PRICE_KEYS).unwrap_or(Decimal::ZERO),
        original_price: first_decimal(raw, ORIGINAL_PRICE_KEYS),
        image,
        images,
        category: read_category(raw),
        in_stock: !is_flagged_unavailable(raw),
        rating: RATING_KEYS.iter().find_map(|k| raw.get(*k).and_then(read_f32)),
        review_count: REVIEW_COUNT_KEYS
            .iter()
            .find_map(|k| raw.get(*k).and_then(read_i64))
            .and_then(|n| u32::try_from(n).ok()),
        featured: FEATURED_KEYS
            .iter()
            .find_map(|k| raw.get(*k).and_then(read_bool))
            .unwrap_or(false),
        origin: first_string(raw, &["origine", "origin"]),
        weight: first_string(raw, &["poids", "weight"]),
        dimensions: first_string(raw, &["dimensions"]),
    }
}

/// Normalizes a backend category record into a [`Category`].
#[must_use]
pub fn normalize_category(raw: &Value) -> Category {
    let name = first_string(raw, &["nom", "name", "title", "label"]).unwrap_or_default();
    let id = first_string(raw, &["id", "_id", "slug"]).unwrap_or_else(|| name.clone());
    Category {
        id,
        name,
        slug: first_string(raw, &["slug"]),
    }
}

/// Normalizes every line of a cart payload and folds them into a [`Cart`].
///
/// Lines whose product has no identifier are dropped, since they cannot be
/// addressed by later mutations. Quantities below 1 are dropped and repeated
/// products are merged by [`Cart::from_lines`].
#[must_use]
pub fn normalize_cart(payload: &CartPayload, placeholder_image: &str) -> Cart {
    Cart::from_lines(payload.lines.iter().filter_map(|line| {
        let product = normalize_product(&line.product, placeholder_image);
        if product.id.is_empty() {
            tracing::warn!(
                quantity = line.quantity,
                "dropping cart line whose product has no identifier"
            );
            return None;
        }
        Some((product, line.quantity))
    }))
}

/// First key holding a non-empty string or a number, as a trimmed string.
fn first_string(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match raw.get(*k)? {
        Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_owned),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First key holding a non-negative decimal, as a number or a string such as
/// `"12,50"` or `"12.50 €"`.
fn first_decimal(raw: &Value, keys: &[&str]) -> Option<Decimal> {
    keys.iter().find_map(|k| {
        raw.get(*k)
            .and_then(read_decimal)
            .filter(|d| !d.is_sign_negative())
    })
}

fn read_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '€' && *c != '\u{a0}')
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            Decimal::from_str(&cleaned).ok()
        }
        _ => None,
    }
}

fn read_f32(value: &Value) -> Option<f32> {
    #[allow(clippy::cast_possible_truncation)]
    let parsed = match value {
        Value::Number(n) => n.as_f64().map(|f| f as f32),
        Value::String(s) => s.trim().replace(',', ".").parse::<f32>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn read_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "oui" => Some(true),
            "false" | "0" | "no" | "non" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// URL from either a plain string or an object with `url`/`src`.
fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_owned),
        Value::Object(_) => first_string(value, &["url", "src"]),
        _ => None,
    }
}

fn read_images(raw: &Value) -> Vec<String> {
    raw.get("images")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(image_url).collect())
        .unwrap_or_default()
}

/// Category reference: a scalar id/name, or an object carrying one.
fn read_category(raw: &Value) -> Option<String> {
    CATEGORY_KEYS.iter().find_map(|k| match raw.get(*k)? {
        obj @ Value::Object(_) => first_string(obj, &["nom", "name", "slug", "id"]),
        Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_owned),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// `true` only when the record is explicitly archived or declined.
fn is_flagged_unavailable(raw: &Value) -> bool {
    let flagged = UNAVAILABLE_FLAG_KEYS
        .iter()
        .any(|k| raw.get(*k).and_then(read_bool).unwrap_or(false));
    let status = ["status", "state", "statut"].iter().any(|k| {
        raw.get(*k)
            .and_then(Value::as_str)
            .is_some_and(|s| UNAVAILABLE_STATUSES.contains(&s.trim().to_ascii_lowercase().as_str()))
    });
    flagged || status
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
