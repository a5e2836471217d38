//! Refund Core Error Types
//!
//! Error definitions for refund lifecycle operations. Three classes matter
//! to callers: validation failures (rejected before any side effect),
//! gateway failures (recorded in the audit ledger, booking left as-is), and
//! persistence failures (ledger or booking store unavailable).

use rust_decimal::Decimal;
use thiserror::Error;

use crate::gateway::GatewayError;
use crate::types::{BookingId, BookingStatus};

/// Refund core error
#[derive(Error, Debug)]
pub enum RefundError {
    /// The booking does not exist in the record store
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// The booking has no payment reference to refund against
    #[error("booking {id} has no payment reference to refund against")]
    MissingPayment { id: BookingId },

    /// The booking is not in a state a refund can start from
    #[error("booking {id} is {status}; refunds start from cancelled or refund_failed")]
    NotRefundable { id: BookingId, status: BookingStatus },

    /// The requested amount is outside the allowed range
    #[error("refund amount {amount} must be positive and at most the service price {service_price}")]
    AmountOutOfRange {
        amount: Decimal,
        service_price: Decimal,
    },

    /// An audit draft is missing a required field
    #[error("audit entry missing required field: {0}")]
    IncompleteAuditEntry(&'static str),

    /// The external refund call failed or timed out
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Ledger or booking store failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Missing or inconsistent wiring at construction time
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Refund core result type
pub type RefundResult<T> = Result<T, RefundError>;

impl RefundError {
    /// Precondition failures: rejected before the gateway is contacted and
    /// before anything is written
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::BookingNotFound(_)
                | Self::MissingPayment { .. }
                | Self::NotRefundable { .. }
                | Self::AmountOutOfRange { .. }
                | Self::IncompleteAuditEntry(_)
        )
    }

    /// External refund call failures: always paired with a REFUND_FAILED
    /// ledger entry
    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }

    /// Ledger or booking store failures
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<serde_json::Error> for RefundError {
    fn from(e: serde_json::Error) -> Self {
        RefundError::Storage(format!("serialization error: {}", e))
    }
}
