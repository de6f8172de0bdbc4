use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Environment {
    /// Log level used when `TRADEFOOD_LOG_LEVEL` is unset.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Test | Environment::Production => "info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Base URL of the storefront REST backend, e.g. `https://api.tradefood.fr/`.
    pub api_base_url: String,
    /// Directory holding the persisted cart and token files.
    pub data_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Image substituted for products the backend sends without one.
    pub image_placeholder_url: String,
}

impl AppConfig {
    /// Location of the locally persisted cart document.
    #[must_use]
    pub fn cart_path(&self) -> PathBuf {
        self.data_dir.join("cart.json")
    }

    /// Location of the persisted auth token.
    #[must_use]
    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join("token")
    }
}
