//! Checkout completion.
//!
//! The payment processor confirms payments outside this crate. Once a
//! payment is confirmed as succeeded the cart is cleared, exactly once per
//! payment id. Nothing else is written on checkout.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::CartBackend;
use crate::error::StorageError;
use crate::store::CartStore;
use crate::sync::CartSync;

/// Payment result as reported by the payment processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded { payment_id: String },
    Processing { payment_id: String },
    Failed { payment_id: String, reason: String },
}

impl PaymentOutcome {
    /// Builds an outcome from the status the processor appends to its return
    /// redirect (`succeeded`, `processing`, anything else is a failure).
    #[must_use]
    pub fn from_redirect(payment_id: &str, status: &str) -> Self {
        let payment_id = payment_id.to_owned();
        match status.trim().to_ascii_lowercase().as_str() {
            "succeeded" => Self::Succeeded { payment_id },
            "processing" => Self::Processing { payment_id },
            other => Self::Failed {
                payment_id,
                reason: if other.is_empty() {
                    "missing payment status".to_owned()
                } else {
                    other.to_owned()
                },
            },
        }
    }

    #[must_use]
    pub fn payment_id(&self) -> &str {
        match self {
            Self::Succeeded { payment_id }
            | Self::Processing { payment_id }
            | Self::Failed { payment_id, .. } => payment_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutResult {
    /// Payment succeeded and the cart was cleared.
    Completed,
    /// This payment was already completed; nothing was done.
    AlreadyCompleted,
    /// Payment not settled yet; the cart is kept.
    Pending,
    /// Payment failed; the cart is kept.
    Failed { reason: String },
}

/// Tracks which payments have already cleared the cart.
///
/// Serializable so a process can carry the record across restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutCompletion {
    #[serde(default)]
    completed: BTreeSet<String>,
}

impl CheckoutCompletion {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a record saved with [`Self::save`]. A missing or unreadable file
    /// yields an empty record.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read checkout record");
                return Self::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "checkout record is corrupt; starting empty");
            Self::new()
        })
    }

    /// Writes the record to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        let io_error = |source: std::io::Error| StorageError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let doc = serde_json::to_string_pretty(self).map_err(|e| io_error(e.into()))?;
        std::fs::write(path, doc).map_err(io_error)
    }

    #[must_use]
    pub fn is_completed(&self, payment_id: &str) -> bool {
        self.completed.contains(payment_id)
    }

    /// Handles a payment confirmation, clearing `cart` on the first
    /// successful confirmation of a given payment.
    pub async fn confirm<B, S>(
        &mut self,
        cart: &mut CartSync<B, S>,
        outcome: PaymentOutcome,
    ) -> CheckoutResult
    where
        B: CartBackend,
        S: CartStore,
    {
        match outcome {
            PaymentOutcome::Succeeded { payment_id } => {
                if self.completed.contains(&payment_id) {
                    tracing::debug!(payment_id = %payment_id, "payment already completed; ignoring");
                    return CheckoutResult::AlreadyCompleted;
                }
                cart.clear_cart().await;
                tracing::info!(payment_id = %payment_id, state = %cart.state(), "payment succeeded; cart cleared");
                self.completed.insert(payment_id);
                CheckoutResult::Completed
            }
            PaymentOutcome::Processing { payment_id } => {
                tracing::info!(payment_id = %payment_id, "payment processing; cart kept");
                CheckoutResult::Pending
            }
            PaymentOutcome::Failed { payment_id, reason } => {
                tracing::warn!(payment_id = %payment_id, reason = %reason, "payment failed; cart kept");
                CheckoutResult::Failed { reason }
            }
        }
    }
}
