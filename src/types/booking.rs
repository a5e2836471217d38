//! Booking record types
//!
//! The booking itself is owned by the external record store; the core only
//! reads and updates the fields modeled here.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{BookingId, PaymentId};

/// Booking status
///
/// Closed set of states. The refund lifecycle only ever moves a booking
/// between `Cancelled` and the `Refund*` states; `Upcoming` and `Completed`
/// exist in the store but are outside the refund flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Upcoming,
    Completed,
    Cancelled,
    RefundInitiated,
    RefundProcessed,
    RefundCompleted,
    RefundFailed,
}

impl BookingStatus {
    /// States from which a refund attempt may start
    pub fn refundable(&self) -> bool {
        matches!(self, Self::Cancelled | Self::RefundFailed)
    }

    /// States eligible for a non-normal urgency classification
    pub fn in_refund_flow(&self) -> bool {
        matches!(self, Self::Cancelled | Self::RefundInitiated)
    }

    /// States that count as an open or settled refund case
    pub fn is_refund_case(&self) -> bool {
        matches!(
            self,
            Self::RefundInitiated
                | Self::RefundProcessed
                | Self::RefundCompleted
                | Self::RefundFailed
        )
    }

    /// String form matching the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::RefundInitiated => "refund_initiated",
            Self::RefundProcessed => "refund_processed",
            Self::RefundCompleted => "refund_completed",
            Self::RefundFailed => "refund_failed",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Appointment date and time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSlot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Booking record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Opaque unique identifier
    pub id: BookingId,
    /// Current status
    pub status: BookingStatus,
    /// Original chargeable amount, immutable once set
    pub service_price: Decimal,
    /// Reference to the original payment transaction; refund eligibility
    /// requires this to be present
    pub payment_id: Option<PaymentId>,
    /// Timestamp of the last status change, the anchor for elapsed-time
    /// urgency computation
    pub updated_at: DateTime<Utc>,
    /// Appointment slot, if scheduled
    pub slot: Option<BookingSlot>,
}

impl Booking {
    /// Whether a refund attempt can be started for this booking
    pub fn refund_eligible(&self) -> bool {
        self.status.refundable() && self.payment_id.is_some()
    }
}
