//! In-memory audit ledger
//!
//! Backs tests and embedded use. Same semantics as the file-backed ledger:
//! monotonic ids, append-only, newest-first retrieval.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::error::RefundResult;
use crate::types::{AuditDraft, AuditLogEntry, BookingId};

use super::{AuditLedger, AuditQuery};

/// In-memory append-only audit ledger
pub struct InMemoryAuditLedger {
    entries: RwLock<Vec<AuditLogEntry>>,
    next_id: AtomicU64,
}

impl InMemoryAuditLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of entries written so far
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no entry has been written yet
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryAuditLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditLedger for InMemoryAuditLedger {
    async fn append(&self, draft: AuditDraft) -> RefundResult<AuditLogEntry> {
        draft.validate()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let entry = draft.into_entry(id, Utc::now());

        let mut entries = self.entries.write().await;
        entries.push(entry.clone());

        Ok(entry)
    }

    async fn entry(&self, id: u64) -> RefundResult<Option<AuditLogEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    async fn entries_for_booking(
        &self,
        booking_id: &BookingId,
    ) -> RefundResult<Vec<AuditLogEntry>> {
        let entries = self.entries.read().await;
        let mut matched: Vec<_> = entries
            .iter()
            .filter(|e| &e.booking_id == booking_id)
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(matched)
    }

    async fn entries(&self, query: AuditQuery) -> RefundResult<Vec<AuditLogEntry>> {
        let entries = self.entries.read().await;
        let mut matched: Vec<_> = entries
            .iter()
            .filter(|e| query.matches(e.created_at))
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.id.cmp(&a.id));
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }
}
