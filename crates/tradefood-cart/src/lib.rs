pub mod backend;
pub mod checkout;
pub mod error;
pub mod shared;
pub mod store;
pub mod sync;
pub mod token;

pub use backend::CartBackend;
pub use checkout::{CheckoutCompletion, CheckoutResult, PaymentOutcome};
pub use error::StorageError;
pub use shared::SharedCart;
pub use store::{CartStore, JsonFileStore, MemoryStore, CART_STORAGE_KEY};
pub use sync::{CartSync, SyncState};
pub use token::{spawn_token_watcher, TokenStore};
