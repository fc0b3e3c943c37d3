//! # Checkout Error Types
//!
//! Errors surfaced by the submission pipeline and the read-side queries.
//!
//! ## The Persistence Variant
//! `Persistence` is the saga's voice: a step after the header insert
//! failed, compensation ran, and the caller learns both the original
//! failure and whether the half-written order was cleaned up. When
//! `compensated` is false an orphaned header may remain and the order id
//! names it for manual cleanup.

use thiserror::Error;

use procura_core::CoreError;
use procura_db::DbError;

/// Errors from the checkout orchestration layer.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No branch is linked to the caller's identity. Reads degrade to
    /// anonymous instead of raising this; only writes refuse.
    #[error("No branch is linked to this identity")]
    NoIdentity,

    /// Submission attempted with no cart lines.
    #[error("Cannot submit an order with an empty cart")]
    EmptyCart,

    /// Input failed domain validation (bad quantity, oversized cart).
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// The storage collaborator failed before anything was written.
    #[error("Storage backend error: {0}")]
    Backend(#[from] DbError),

    /// A post-header persistence step failed. Compensation already ran;
    /// `compensated` reports whether it succeeded.
    #[error("Order '{order_id}' could not be fully persisted (compensated: {compensated}): {source}")]
    Persistence {
        order_id: String,
        compensated: bool,
        #[source]
        source: DbError,
    },
}

/// Errors from notification delivery. Always logged and swallowed by the
/// pipeline; submission success never depends on the notifier.
#[derive(Debug, Error)]
#[error("Notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_display_reports_compensation_outcome() {
        let err = CheckoutError::Persistence {
            order_id: "abc".to_string(),
            compensated: true,
            source: DbError::QueryFailed("disk I/O error".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc"));
        assert!(msg.contains("compensated: true"));

        let err = CheckoutError::Persistence {
            order_id: "abc".to_string(),
            compensated: false,
            source: DbError::QueryFailed("disk I/O error".to_string()),
        };
        assert!(err.to_string().contains("compensated: false"));
    }
}
