pub mod catalog;
pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::StorefrontClient;
pub use error::BackendError;
pub use normalize::{normalize_cart, normalize_category, normalize_product};
pub use types::{CartPayload, ProductQuery, RawCartLine};
