//! Refund Gateway Client contract
//!
//! Thin seam to the external payment provider's refund API. The core treats
//! the provider as a black box: one amount against one booking, success or
//! failure, no internal retry. Retries are operator-initiated through the
//! state machine.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::BookingId;

/// Gateway-side failure
///
/// "No response" is failure, never success: money must not be assumed moved
/// without positive confirmation.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// The provider rejected the refund
    #[error("refund declined by gateway: {0}")]
    Declined(String),

    /// The provider could not be reached
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),

    /// The provider did not answer within the configured deadline
    #[error("no response from gateway within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

/// Positive confirmation of a refund accepted by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayReceipt {
    /// Provider-side reference for reconciliation
    pub gateway_reference: String,
}

/// External refund API
#[async_trait]
pub trait RefundGateway: Send + Sync {
    /// Submit a refund of `amount` against the booking's original payment
    async fn refund(
        &self,
        booking_id: &BookingId,
        amount: Decimal,
    ) -> Result<GatewayReceipt, GatewayError>;
}
