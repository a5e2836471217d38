//! SLA / Priority Engine
//!
//! Pure urgency classification from elapsed time since the booking's last
//! status change. No side effects, no storage; cheap enough to recompute on
//! every read, and deterministic for identical inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;

use crate::types::Booking;

/// Urgency classification for an open refund case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Normal,
    Warning,
    Critical,
}

impl Default for Urgency {
    fn default() -> Self {
        Self::Normal
    }
}

impl Urgency {
    /// String form matching the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Elapsed-time thresholds driving urgency classification
///
/// The warning and critical boundaries are inclusive lower bounds; the
/// target-completion value is advisory only and never changes a
/// classification on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlaConfig {
    /// Hours after which an open case becomes a warning
    #[serde(default = "default_warning_hours")]
    pub warning_after_hours: f64,
    /// Hours after which an open case becomes critical
    #[serde(default = "default_critical_hours")]
    pub critical_after_hours: f64,
    /// Advisory target for reaching a terminal state
    #[serde(default = "default_target_hours")]
    pub target_completion_hours: f64,
}

fn default_warning_hours() -> f64 {
    12.0
}

fn default_critical_hours() -> f64 {
    24.0
}

fn default_target_hours() -> f64 {
    48.0
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            warning_after_hours: 12.0,
            critical_after_hours: 24.0,
            target_completion_hours: 48.0,
        }
    }
}

impl SlaConfig {
    /// Load thresholds from environment variables
    ///
    /// Environment variables:
    /// - REFUND_SLA_WARNING_HOURS: warning boundary in hours
    /// - REFUND_SLA_CRITICAL_HOURS: critical boundary in hours
    /// - REFUND_SLA_TARGET_HOURS: advisory completion target in hours
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            warning_after_hours: env::var("REFUND_SLA_WARNING_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.warning_after_hours),
            critical_after_hours: env::var("REFUND_SLA_CRITICAL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.critical_after_hours),
            target_completion_hours: env::var("REFUND_SLA_TARGET_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.target_completion_hours),
        }
    }
}

/// Fractional hours between two instants
///
/// Millisecond resolution; negative when `since` is in the future, which
/// classifies as normal.
pub fn elapsed_hours(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - since).num_milliseconds() as f64 / 3_600_000.0
}

/// Classify a booking's urgency at `now`
///
/// Only bookings still waiting on operator action (cancelled or
/// refund_initiated) can be non-normal; every other status is always normal
/// regardless of elapsed time.
pub fn classify(booking: &Booking, now: DateTime<Utc>, sla: &SlaConfig) -> Urgency {
    if !booking.status.in_refund_flow() {
        return Urgency::Normal;
    }

    let elapsed = elapsed_hours(booking.updated_at, now);
    if elapsed >= sla.critical_after_hours {
        Urgency::Critical
    } else if elapsed >= sla.warning_after_hours {
        Urgency::Warning
    } else {
        Urgency::Normal
    }
}

/// Whether an open case has exceeded the advisory completion target
pub fn past_target(booking: &Booking, now: DateTime<Utc>, sla: &SlaConfig) -> bool {
    booking.status.in_refund_flow()
        && elapsed_hours(booking.updated_at, now) >= sla.target_completion_hours
}
