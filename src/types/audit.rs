//! Audit trail types
//!
//! Every state-changing action against a booking's refund status produces
//! exactly one `AuditLogEntry`. Entries are created once and never mutated;
//! the ledger is the sole source of truth for what happened and when.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{RefundError, RefundResult};

use super::booking::BookingStatus;
use super::common::{AdminUserId, BookingId};

/// Audited action kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    RefundProcessed,
    BatchRefundProcessed,
    RefundFailed,
    StatusOverride,
}

impl AuditAction {
    /// String form matching the stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RefundProcessed => "REFUND_PROCESSED",
            Self::BatchRefundProcessed => "BATCH_REFUND_PROCESSED",
            Self::RefundFailed => "REFUND_FAILED",
            Self::StatusOverride => "STATUS_OVERRIDE",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted audit trail entry
///
/// `id` and `created_at` are assigned by the ledger on append and are
/// immutable afterwards, as is every other field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Monotonically increasing entry id, assigned by the ledger
    pub id: u64,
    /// The booking the action concerns
    pub booking_id: BookingId,
    /// Operator who performed the action
    pub admin_user_id: AdminUserId,
    /// What was done
    pub action: AuditAction,
    /// Booking status snapshot before the action, when known
    pub previous_status: Option<BookingStatus>,
    /// Booking status snapshot after the action, when one was applied
    pub new_status: Option<BookingStatus>,
    /// Monetary amount associated with the action
    pub refund_amount: Option<Decimal>,
    /// Free-text annotation: error messages, operator comments
    pub note: Option<String>,
    /// Assignment timestamp, immutable
    pub created_at: DateTime<Utc>,
}

/// An audit entry awaiting persistence
///
/// Carries every field of [`AuditLogEntry`] except `id` and `created_at`,
/// which only the ledger assigns. Call sites cannot construct an entry with
/// a forged id or timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditDraft {
    pub booking_id: BookingId,
    pub admin_user_id: AdminUserId,
    pub action: AuditAction,
    pub previous_status: Option<BookingStatus>,
    pub new_status: Option<BookingStatus>,
    pub refund_amount: Option<Decimal>,
    pub note: Option<String>,
}

impl AuditDraft {
    /// Create a draft with the required fields
    pub fn new(booking_id: BookingId, admin_user_id: AdminUserId, action: AuditAction) -> Self {
        Self {
            booking_id,
            admin_user_id,
            action,
            previous_status: None,
            new_status: None,
            refund_amount: None,
            note: None,
        }
    }

    /// Set the before/after status snapshots
    pub fn statuses(
        mut self,
        previous: Option<BookingStatus>,
        new: Option<BookingStatus>,
    ) -> Self {
        self.previous_status = previous;
        self.new_status = new;
        self
    }

    /// Set the monetary amount
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.refund_amount = Some(amount);
        self
    }

    /// Set the free-text note
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Check that the required fields are usable before persisting
    pub fn validate(&self) -> RefundResult<()> {
        if self.booking_id.as_str().is_empty() {
            return Err(RefundError::IncompleteAuditEntry("booking_id"));
        }
        if self.admin_user_id.as_str().is_empty() {
            return Err(RefundError::IncompleteAuditEntry("admin_user_id"));
        }
        Ok(())
    }

    /// Materialize the draft into a stored entry
    ///
    /// Only ledger implementations should call this; `id` must come from the
    /// ledger's own sequence.
    pub fn into_entry(self, id: u64, created_at: DateTime<Utc>) -> AuditLogEntry {
        AuditLogEntry {
            id,
            booking_id: self.booking_id,
            admin_user_id: self.admin_user_id,
            action: self.action,
            previous_status: self.previous_status,
            new_status: self.new_status,
            refund_amount: self.refund_amount,
            note: self.note,
            created_at,
        }
    }
}
