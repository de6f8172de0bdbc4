//! Local cart persistence.
//!
//! A [`CartStore`] never reports failure to its caller. Unreadable, corrupt,
//! or missing data loads as an empty cart; failed writes are logged and
//! dropped. The cart module keeps working in memory either way.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tradefood_core::Cart;

/// Storage key the cart is saved under. Used as the file stem by
/// [`JsonFileStore::in_dir`].
pub const CART_STORAGE_KEY: &str = "cart";

/// Current on-disk document version.
const FORMAT_VERSION: u32 = 1;

pub trait CartStore: Send + Sync {
    /// Returns the saved cart, or an empty cart when nothing usable is stored.
    fn load(&self) -> Cart;

    /// Persists `cart`, replacing any previous value.
    fn save(&self, cart: &Cart);

    /// Removes the saved cart.
    fn clear(&self);
}

#[derive(Serialize)]
struct StoredCartRef<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    cart: &'a Cart,
}

#[derive(Deserialize)]
struct StoredCart {
    version: u32,
    cart: Cart,
}

fn encode(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StoredCartRef {
        version: FORMAT_VERSION,
        saved_at: Utc::now(),
        cart,
    })
}

/// Decodes a stored document; anything unusable becomes an empty cart.
fn decode(raw: &str, location: &str) -> Cart {
    match serde_json::from_str::<StoredCart>(raw) {
        Ok(doc) if doc.version == FORMAT_VERSION => doc.cart,
        Ok(doc) => {
            tracing::warn!(
                location,
                version = doc.version,
                expected = FORMAT_VERSION,
                "stored cart has unsupported version; starting empty"
            );
            Cart::new()
        }
        Err(e) => {
            tracing::warn!(location, error = %e, "stored cart is corrupt; starting empty");
            Cart::new()
        }
    }
}

/// Cart persisted as a JSON document on disk.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/cart.json`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{CART_STORAGE_KEY}.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl CartStore for JsonFileStore {
    fn load(&self) -> Cart {
        let location = self.path.display().to_string();
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw, &location),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Cart::new(),
            Err(e) => {
                tracing::warn!(location, error = %e, "failed to read stored cart; starting empty");
                Cart::new()
            }
        }
    }

    fn save(&self, cart: &Cart) {
        let result = encode(cart)
            .map_err(std::io::Error::from)
            .and_then(|doc| self.write(&doc));
        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist cart");
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove stored cart");
            }
        }
    }
}

/// In-process store holding the serialized document.
///
/// Can be switched to "unavailable" to behave like disabled storage: loads
/// return an empty cart and writes are dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Raw stored document, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }

    /// Replaces the raw stored document.
    pub fn set_raw(&self, raw: Option<String>) {
        if let Ok(mut guard) = self.slot.lock() {
            *guard = raw;
        }
    }

    fn is_available(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }
}

impl CartStore for MemoryStore {
    fn load(&self) -> Cart {
        if !self.is_available() {
            tracing::warn!("cart storage unavailable; starting empty");
            return Cart::new();
        }
        match self.raw() {
            Some(raw) => decode(&raw, "memory"),
            None => Cart::new(),
        }
    }

    fn save(&self, cart: &Cart) {
        if !self.is_available() {
            tracing::warn!("cart storage unavailable; dropping write");
            return;
        }
        match encode(cart) {
            Ok(doc) => self.set_raw(Some(doc)),
            Err(e) => tracing::warn!(error = %e, "failed to serialize cart"),
        }
    }

    fn clear(&self) {
        self.set_raw(None);
    }
}

impl<T: CartStore + ?Sized> CartStore for std::sync::Arc<T> {
    fn load(&self) -> Cart {
        (**self).load()
    }

    fn save(&self, cart: &Cart) {
        (**self).save(cart);
    }

    fn clear(&self) {
        (**self).clear();
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
