//! Session context injected into the cart synchronization module.
//!
//! The presence of an [`AuthToken`] is the only thing that decides whether
//! the backend or the local store is the cart's source of truth.

use serde::{Deserialize, Serialize};

/// Bearer token issued by the backend on login.
///
/// `Debug` never prints the token value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token. Blank strings (after trimming) are not tokens.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([redacted])")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Anonymous,
    Authenticated,
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionMode::Anonymous => write!(f, "anonymous"),
            SessionMode::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Explicit auth state handed to the cart module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    token: Option<AuthToken>,
}

impl SessionContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    #[must_use]
    pub fn authenticated(token: AuthToken) -> Self {
        Self { token: Some(token) }
    }

    #[must_use]
    pub fn from_token(token: Option<AuthToken>) -> Self {
        Self { token }
    }

    #[must_use]
    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        if self.token.is_some() {
            SessionMode::Authenticated
        } else {
            SessionMode::Anonymous
        }
    }

    pub fn set_token(&mut self, token: Option<AuthToken>) {
        self.token = token;
    }
}

/// External signals the cart module reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The persisted token was written, replaced, or removed.
    TokenChanged(Option<AuthToken>),
    /// The user explicitly logged out.
    Logout,
}
