pub mod app_config;
pub mod cart;
pub mod config;
pub mod price;
pub mod products;
pub mod session;

pub use app_config::{AppConfig, Environment};
pub use cart::{clamp_quantity, Cart, CartItem, CartMutation};
pub use config::{load_app_config, load_app_config_from_env};
pub use price::format_eur;
pub use products::{Category, Product};
pub use session::{AuthToken, SessionContext, SessionEvent, SessionMode};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
