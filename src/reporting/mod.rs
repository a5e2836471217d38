//! Reporting Aggregator
//!
//! Read-only derivations over the ledger and booking data; never writes.
//! Results reflect a point-in-time snapshot and make no consistency
//! guarantee stronger than read-committed as of invocation.

mod export;
mod summary;

pub use export::{
    audit_export_rows, summary_export_rows, AdminProfile, AuditExportRow, BookingDescriptor,
    ExportDirectory, SummaryExportRow,
};
pub use summary::{
    monthly_summary, success_rate, MonthlySummary, StatusBreakdown, DEFAULT_MONTHS_BACK,
};

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::RefundResult;
use crate::ledger::{AuditLedger, AuditQuery};
use crate::types::{AuditLogEntry, Booking};

/// Read-only reporting facade over the audit ledger
pub struct ReportingAggregator {
    ledger: Arc<dyn AuditLedger>,
}

impl ReportingAggregator {
    /// Create an aggregator over a ledger
    pub fn new(ledger: Arc<dyn AuditLedger>) -> Self {
        Self { ledger }
    }

    /// Audit entries within an optional date window, newest-first
    ///
    /// A pure read projection over the ledger with no independent state.
    pub async fn filtered_audit(
        &self,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> RefundResult<Vec<AuditLogEntry>> {
        self.ledger
            .entries(AuditQuery {
                date_from,
                date_to,
                limit: None,
            })
            .await
    }

    /// Summarize the trailing `months_back` calendar months over a booking
    /// snapshot
    pub fn monthly_summary(
        &self,
        bookings: &[Booking],
        months_back: u32,
        now: DateTime<Utc>,
    ) -> Vec<MonthlySummary> {
        summary::monthly_summary(bookings, months_back, now)
    }
}
