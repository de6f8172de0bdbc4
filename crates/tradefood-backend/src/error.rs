use thiserror::Error;

/// Errors returned by the storefront backend client.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the bearer token (HTTP 401/403).
    #[error("unauthorized request to {url} (HTTP {status})")]
    Unauthorized { status: u16, url: String },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A login response carried no recognizable token field.
    #[error("login response from {url} did not contain a token")]
    MissingToken { url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl BackendError {
    /// `true` when the failure means the session token is no longer valid.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, BackendError::Unauthorized { .. })
    }
}
