//! File-backed audit ledger
//!
//! One JSON document per entry plus a JSON index cached in memory. The id
//! sequence is re-seeded from the index on open, so ids stay monotonic
//! across restarts. Entry files are written once and never rewritten.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::sync::RwLock;

use crate::error::{RefundError, RefundResult};
use crate::types::{AuditAction, AuditDraft, AuditLogEntry, BookingId};

use super::{AuditLedger, AuditQuery};

/// Index entry: the query-relevant fields of one audit document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuditIndexEntry {
    id: u64,
    booking_id: BookingId,
    action: AuditAction,
    created_at: DateTime<Utc>,
}

/// File-based append-only audit ledger
pub struct FileAuditLedger {
    /// Entry documents directory
    entries_path: PathBuf,
    /// Index path
    index_path: PathBuf,
    /// In-memory index cache
    index: RwLock<Vec<AuditIndexEntry>>,
    /// Next id to assign
    next_id: AtomicU64,
}

impl FileAuditLedger {
    /// Open (or create) a ledger rooted at `base_path`
    pub async fn open(base_path: impl Into<PathBuf>) -> RefundResult<Self> {
        let base_path = base_path.into();
        let entries_path = base_path.join("entries");
        let index_path = base_path.join("audit_index.json");

        for path in [&base_path, &entries_path] {
            fs::create_dir_all(path).await.map_err(|e| {
                RefundError::Storage(format!("failed to create directory {:?}: {}", path, e))
            })?;
        }

        let index: Vec<AuditIndexEntry> = if index_path.exists() {
            let data = fs::read_to_string(&index_path).await.map_err(|e| {
                RefundError::Storage(format!("failed to read audit index: {}", e))
            })?;
            serde_json::from_str(&data)
                .map_err(|e| RefundError::Storage(format!("failed to parse audit index: {}", e)))?
        } else {
            Vec::new()
        };

        // Resume the sequence after the highest persisted id
        let next_id = index.iter().map(|e| e.id).max().unwrap_or(0) + 1;

        Ok(Self {
            entries_path,
            index_path,
            index: RwLock::new(index),
            next_id: AtomicU64::new(next_id),
        })
    }

    fn entry_path(&self, id: u64) -> PathBuf {
        self.entries_path.join(format!("{:020}.json", id))
    }

    /// Save the index to disk
    async fn save_index(&self) -> RefundResult<()> {
        let snapshot: Vec<AuditIndexEntry> = self.index.read().await.clone();

        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.index_path, json).await.map_err(|e| {
            RefundError::Storage(format!("failed to write audit index: {}", e))
        })?;

        Ok(())
    }

    /// Read one entry document from disk
    async fn read_entry(&self, id: u64) -> RefundResult<Option<AuditLogEntry>> {
        let path = self.entry_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).await.map_err(|e| {
            RefundError::Storage(format!("failed to read audit entry {}: {}", id, e))
        })?;

        let entry: AuditLogEntry = serde_json::from_str(&json).map_err(|e| {
            RefundError::Storage(format!("failed to parse audit entry {}: {}", id, e))
        })?;

        Ok(Some(entry))
    }

    /// Read the entries behind a newest-first-sorted slice of index entries
    async fn read_entries(&self, index_entries: Vec<AuditIndexEntry>) -> RefundResult<Vec<AuditLogEntry>> {
        let mut entries = Vec::with_capacity(index_entries.len());
        for meta in index_entries {
            if let Some(entry) = self.read_entry(meta.id).await? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl AuditLedger for FileAuditLedger {
    async fn append(&self, draft: AuditDraft) -> RefundResult<AuditLogEntry> {
        draft.validate()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let entry = draft.into_entry(id, Utc::now());

        // Persist the document before the index so a crash between the two
        // leaves an orphaned file rather than a dangling index row
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(self.entry_path(id), json).await.map_err(|e| {
            RefundError::Storage(format!("failed to write audit entry {}: {}", id, e))
        })?;

        {
            let mut index = self.index.write().await;
            index.push(AuditIndexEntry {
                id,
                booking_id: entry.booking_id.clone(),
                action: entry.action,
                created_at: entry.created_at,
            });
        }

        self.save_index().await?;

        Ok(entry)
    }

    async fn entry(&self, id: u64) -> RefundResult<Option<AuditLogEntry>> {
        let known = {
            let index = self.index.read().await;
            index.iter().any(|e| e.id == id)
        };
        if !known {
            return Ok(None);
        }
        self.read_entry(id).await
    }

    async fn entries_for_booking(
        &self,
        booking_id: &BookingId,
    ) -> RefundResult<Vec<AuditLogEntry>> {
        let matched = {
            let index = self.index.read().await;
            let mut matched: Vec<_> = index
                .iter()
                .filter(|e| &e.booking_id == booking_id)
                .cloned()
                .collect();
            matched.sort_by(|a, b| b.id.cmp(&a.id));
            matched
        };

        self.read_entries(matched).await
    }

    async fn entries(&self, query: AuditQuery) -> RefundResult<Vec<AuditLogEntry>> {
        let matched = {
            let index = self.index.read().await;
            let mut matched: Vec<_> = index
                .iter()
                .filter(|e| query.matches(e.created_at))
                .cloned()
                .collect();
            matched.sort_by(|a, b| b.id.cmp(&a.id));
            if let Some(limit) = query.limit {
                matched.truncate(limit);
            }
            matched
        };

        self.read_entries(matched).await
    }
}
