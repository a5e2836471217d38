//! Audit Ledger
//!
//! Durable, append-only storage and retrieval of audit trail entries. The
//! interface exposes no update or delete operation; that absence, not
//! convention at call sites, is what keeps the ledger trustworthy as a
//! compliance record independent of current booking state.

mod file;
mod memory;

pub use file::FileAuditLedger;
pub use memory::InMemoryAuditLedger;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::RefundResult;
use crate::types::{AuditDraft, AuditLogEntry, BookingId};

/// Date-bounded ledger query
///
/// The interval is inclusive on both ends when both bounds are given; an
/// absent bound is unbounded on that side. `limit` caps the newest-first
/// result, unbounded when absent.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    /// Whether a timestamp falls inside the query window
    pub fn matches(&self, at: DateTime<Utc>) -> bool {
        self.date_from.map_or(true, |from| at >= from)
            && self.date_to.map_or(true, |to| at <= to)
    }
}

/// Append-only audit ledger
#[async_trait]
pub trait AuditLedger: Send + Sync {
    /// Validate and persist a draft, assigning its id and timestamp
    ///
    /// Never fails silently: any persistence fault surfaces to the caller.
    async fn append(&self, draft: AuditDraft) -> RefundResult<AuditLogEntry>;

    /// Fetch one entry by id
    async fn entry(&self, id: u64) -> RefundResult<Option<AuditLogEntry>>;

    /// All entries for one booking, newest-first
    async fn entries_for_booking(&self, booking_id: &BookingId)
        -> RefundResult<Vec<AuditLogEntry>>;

    /// Entries within an optional date window, newest-first, capped at the
    /// query limit
    async fn entries(&self, query: AuditQuery) -> RefundResult<Vec<AuditLogEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_query_window_is_inclusive() {
        let now = Utc::now();
        let query = AuditQuery {
            date_from: Some(now - Duration::days(1)),
            date_to: Some(now),
            limit: None,
        };

        assert!(query.matches(now));
        assert!(query.matches(now - Duration::days(1)));
        assert!(query.matches(now - Duration::hours(12)));
        assert!(!query.matches(now + Duration::seconds(1)));
        assert!(!query.matches(now - Duration::days(2)));
    }

    #[test]
    fn test_unbounded_query_matches_everything() {
        let query = AuditQuery::default();
        assert!(query.matches(Utc::now()));
        assert!(query.matches(Utc::now() - Duration::days(10_000)));
    }
}
