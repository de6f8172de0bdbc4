//! Cart value type and its pure reducer.
//!
//! [`Cart`] never holds two entries for the same product id and never holds
//! an item with a quantity below 1. Every mutation path, local or reconciled
//! from the backend, goes through the methods here so those invariants hold
//! regardless of where the data came from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::Product;

/// A product snapshot paired with a positive quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    pub product: Product,
    quantity: u32,
}

impl CartItem {
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// Unit price times quantity, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product
            .price
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or_else(|| {
                tracing::warn!(
                    product_id = %self.product.id,
                    quantity = self.quantity,
                    "line total overflows; saturating"
                );
                Decimal::MAX
            })
    }
}

/// A cart mutation, applied either remotely or to the local copy.
#[derive(Debug, Clone, PartialEq)]
pub enum CartMutation {
    Add { product: Product, quantity: u32 },
    Remove { product_id: String },
    UpdateQuantity { product_id: String, quantity: i64 },
    Clear,
}

impl CartMutation {
    /// Returns the equivalent canonical mutation: an `UpdateQuantity` to zero
    /// or below becomes a `Remove`.
    #[must_use]
    pub fn canonical(self) -> Self {
        match self {
            Self::UpdateQuantity {
                product_id,
                quantity,
            } if quantity <= 0 => Self::Remove { product_id },
            other => other,
        }
    }

    /// Short label for log output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::Clear => "clear",
        }
    }
}

/// Ordered set of [`CartItem`]s, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CartWire")]
pub struct Cart {
    items: Vec<CartItem>,
}

/// Deserialization shape for [`Cart`]. Routed through [`Cart::from_lines`]
/// so a hand-edited or stale document cannot break the invariants.
#[derive(Deserialize)]
struct CartWire {
    #[serde(default)]
    items: Vec<CartItemWire>,
}

#[derive(Deserialize)]
struct CartItemWire {
    product: Product,
    quantity: i64,
}

impl From<CartWire> for Cart {
    fn from(wire: CartWire) -> Self {
        Self::from_lines(wire.items.into_iter().map(|i| (i.product, i.quantity)))
    }
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from raw `(product, quantity)` lines.
    ///
    /// Lines with a quantity below 1 are dropped and repeated products are
    /// merged, so the result satisfies the cart invariants whatever the input.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (Product, i64)>,
    {
        let mut cart = Self::new();
        for (product, quantity) in lines {
            if quantity > 0 {
                cart.add(product, clamp_quantity(quantity));
            }
        }
        cart
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Adds `quantity` units of `product`. A product already in the cart has
    /// its quantity increased; a new product is appended. Adding zero units
    /// is a no-op.
    pub fn add(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem { product, quantity });
        }
    }

    /// Removes the product. Returns `true` if it was present.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        self.items.len() != before
    }

    /// Sets the product's quantity. A quantity of zero or below removes it.
    /// Unknown products are left untouched.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = clamp_quantity(quantity);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Applies a [`CartMutation`] to this cart.
    pub fn apply(&mut self, mutation: &CartMutation) {
        match mutation {
            CartMutation::Add { product, quantity } => self.add(product.clone(), *quantity),
            CartMutation::Remove { product_id } => {
                self.remove(product_id);
            }
            CartMutation::UpdateQuantity {
                product_id,
                quantity,
            } => self.update_quantity(product_id, *quantity),
            CartMutation::Clear => self.clear(),
        }
    }

    /// Sum of unit price times quantity over all items, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(CartItem::line_total)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .unwrap_or_else(|| {
                tracing::warn!(items = self.items.len(), "cart total overflows; saturating");
                Decimal::MAX
            })
    }

    /// Sum of quantities over all items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

/// Converts a positive quantity to `u32`, saturating at `u32::MAX`.
#[must_use]
pub fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
