//! Batch Remediation Processor
//!
//! Applies the single-booking full-price refund across a caller-supplied
//! set of booking ids, isolating failures per item. The operation is not
//! atomic across the set: partial completion is an expected, normal
//! outcome, and the caller re-queries to see which bookings advanced.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::service::RefundService;
use crate::types::{AdminUserId, BookingId};

/// Batch remediation settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Upper bound on concurrent in-flight gateway calls
    ///
    /// 1 (the default) processes items strictly in input order, which keeps
    /// audit-log ordering deterministic and bounds load on the gateway.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

fn default_max_in_flight() -> usize {
    1
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_in_flight: 1 }
    }
}

impl BatchConfig {
    /// Load settings from environment variables
    ///
    /// Environment variables:
    /// - REFUND_BATCH_MAX_IN_FLIGHT: concurrent gateway call bound
    pub fn from_env() -> Self {
        Self {
            max_in_flight: env::var("REFUND_BATCH_MAX_IN_FLIGHT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or_else(default_max_in_flight),
        }
    }
}

/// Outcome counters of one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Items whose refund the gateway accepted
    pub succeeded: u32,
    /// Items rejected by validation, the gateway, or persistence
    pub failed: u32,
}

/// Batch refund processor
pub struct BatchProcessor {
    service: Arc<RefundService>,
    config: BatchConfig,
}

impl BatchProcessor {
    /// Create a processor over a refund service
    pub fn new(service: Arc<RefundService>, config: BatchConfig) -> Self {
        Self { service, config }
    }

    /// Refund every booking in `ids` at its full service price
    ///
    /// Duplicate ids are collapsed before dispatch so no booking is ever
    /// submitted to the gateway twice by one run. A failure for one booking
    /// never aborts the remaining items; each attempt's outcome is recorded
    /// in the audit ledger before the run moves on.
    pub async fn run(&self, ids: &[BookingId], admin: &AdminUserId) -> BatchOutcome {
        let unique = dedupe(ids);
        let total = unique.len();

        let outcome = if self.config.max_in_flight <= 1 {
            self.run_sequential(unique, admin).await
        } else {
            self.run_bounded(unique, admin).await
        };

        info!(
            total,
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "batch refund run complete"
        );

        outcome
    }

    async fn run_sequential(&self, ids: Vec<BookingId>, admin: &AdminUserId) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for id in ids {
            match self.service.process_refund_for_batch(&id, admin).await {
                Ok(_) => outcome.succeeded += 1,
                Err(e) => {
                    warn!(booking_id = %id, error = %e, "batch refund item failed");
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }

    async fn run_bounded(&self, ids: Vec<BookingId>, admin: &AdminUserId) -> BatchOutcome {
        let semaphore = Arc::new(Semaphore::new(self.config.max_in_flight));
        let mut workers = JoinSet::new();

        for id in ids {
            let semaphore = semaphore.clone();
            let service = self.service.clone();
            let admin = admin.clone();
            workers.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return false,
                };
                match service.process_refund_for_batch(&id, &admin).await {
                    Ok(_) => true,
                    Err(e) => {
                        warn!(booking_id = %id, error = %e, "batch refund item failed");
                        false
                    }
                }
            });
        }

        let mut outcome = BatchOutcome::default();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(true) => outcome.succeeded += 1,
                Ok(false) => outcome.failed += 1,
                Err(e) => {
                    warn!(error = %e, "batch refund worker aborted");
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }
}

/// Collapse duplicate ids, preserving first-seen order
fn dedupe(ids: &[BookingId]) -> Vec<BookingId> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect()
}
