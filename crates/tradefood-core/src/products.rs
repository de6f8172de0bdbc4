use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product in the storefront's canonical shape.
///
/// Built from backend records by the normalizer in `tradefood-backend`; the
/// cart stores full snapshots of this type rather than bare identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend identifier, stored as a string whether the backend sends a
    /// number or a string.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Unit price, tax included.
    pub price: Decimal,
    /// Pre-discount price, when the product is on sale.
    #[serde(default)]
    pub original_price: Option<Decimal>,
    /// Primary image URL. Never empty: the normalizer substitutes a placeholder.
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub in_stock: bool,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub featured: bool,
    /// Country or region of provenance, e.g. `"Madagascar"`.
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
}

impl Product {
    /// Returns `true` when an original price above the current price is set.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|orig| orig > self.price)
    }

    /// Discount relative to the original price, rounded to the nearest whole
    /// percent. `None` when the product is not on sale.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price.filter(|_| self.is_on_sale())?;
        let ratio = (original - self.price) / original * Decimal::ONE_HUNDRED;
        ratio.round().to_u32()
    }
}

/// A catalog category, e.g. "Épices rares".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}
