//! Refund Lifecycle Core
//!
//! Governs how a cancelled booking moves toward a completed (or failed)
//! monetary refund, records every state change immutably for compliance,
//! and classifies aging cases so operators act on the oldest ones first.
//!
//! - Single-booking transitions run through [`RefundService`], which
//!   validates eligibility, calls the external gateway under a deadline,
//!   and writes exactly one [`AuditLogEntry`] per attempt.
//! - The [`AuditLedger`] is append-only by interface: no update or delete
//!   exists, so the trail stays trustworthy independent of booking state.
//! - [`sla::classify`] is a pure urgency signal recomputed on every read.
//! - [`BatchProcessor`] applies full-price refunds across many bookings
//!   with per-item failure isolation.
//! - [`ReportingAggregator`] derives monthly summaries and filtered audit
//!   views, read-only.

pub mod batch;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod reporting;
pub mod service;
pub mod sla;
pub mod store;
pub mod types;

pub use batch::{BatchConfig, BatchOutcome, BatchProcessor};
pub use config::RefundConfig;
pub use error::{RefundError, RefundResult};
pub use gateway::{GatewayError, GatewayReceipt, RefundGateway};
pub use ledger::{AuditLedger, AuditQuery, FileAuditLedger, InMemoryAuditLedger};
pub use reporting::{MonthlySummary, ReportingAggregator, StatusBreakdown};
pub use service::{RefundService, RefundServiceBuilder};
pub use sla::{classify, SlaConfig, Urgency};
pub use store::{BookingStore, InMemoryBookingStore};
pub use types::{
    AdminUserId, AuditAction, AuditDraft, AuditLogEntry, Booking, BookingId, BookingSlot,
    BookingStatus, PaymentId,
};
