//! Monthly refund summaries
//!
//! Pure derivations over a point-in-time booking snapshot. Months are keyed
//! by the booking's `updated_at`, so a booking touched again later moves to
//! the new month on re-aggregation.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Booking, BookingStatus};

/// Default trailing window for monthly summaries
pub const DEFAULT_MONTHS_BACK: u32 = 12;

/// Per-status case counts within one month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub initiated: u32,
    pub processed: u32,
    pub completed: u32,
    pub failed: u32,
}

/// One calendar month of refund activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    /// Bookings in any refund case status this month
    pub case_count: u32,
    /// Sum of service prices over processed and completed cases
    pub total_refunds: Decimal,
    /// `total_refunds` over the processed+completed count; zero when there
    /// are no such cases
    pub average_refund: Decimal,
    pub breakdown: StatusBreakdown,
}

impl MonthlySummary {
    fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            case_count: 0,
            total_refunds: Decimal::ZERO,
            average_refund: Decimal::ZERO,
            breakdown: StatusBreakdown::default(),
        }
    }

    /// Month label in `YYYY-MM` form
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Walk a calendar month backwards
fn shift_month(year: i32, month: u32, back: u32) -> (i32, u32) {
    let total = i64::from(year) * 12 + i64::from(month) - 1 - i64::from(back);
    ((total.div_euclid(12)) as i32, (total.rem_euclid(12) + 1) as u32)
}

/// Summarize the trailing `months_back` calendar months at `now`
///
/// The current partial month is included and the output is sorted most
/// recent month first, one row per month even when nothing happened in it.
/// Safe to call repeatedly and concurrently with writes: the snapshot the
/// caller passes in is all that is read.
pub fn monthly_summary(
    bookings: &[Booking],
    months_back: u32,
    now: DateTime<Utc>,
) -> Vec<MonthlySummary> {
    let mut summaries = Vec::with_capacity(months_back as usize);

    for back in 0..months_back {
        let (year, month) = shift_month(now.year(), now.month(), back);
        let mut summary = MonthlySummary::empty(year, month);
        let mut refunded_cases = 0u32;

        for booking in bookings {
            if booking.updated_at.year() != year || booking.updated_at.month() != month {
                continue;
            }

            match booking.status {
                BookingStatus::RefundInitiated => summary.breakdown.initiated += 1,
                BookingStatus::RefundProcessed => {
                    summary.breakdown.processed += 1;
                    summary.total_refunds += booking.service_price;
                    refunded_cases += 1;
                }
                BookingStatus::RefundCompleted => {
                    summary.breakdown.completed += 1;
                    summary.total_refunds += booking.service_price;
                    refunded_cases += 1;
                }
                BookingStatus::RefundFailed => summary.breakdown.failed += 1,
                _ => continue,
            }
            summary.case_count += 1;
        }

        if refunded_cases > 0 {
            summary.average_refund = summary.total_refunds / Decimal::from(refunded_cases);
        }

        summaries.push(summary);
    }

    summaries
}

/// Share of terminal refund cases that completed
///
/// `completed / (completed + failed)`, defaulting to 1.0 when there are no
/// terminal cases at all. Note the default conflates "no cases yet" with
/// "perfect success"; callers presenting this figure should check the
/// counts too.
pub fn success_rate(completed: u64, failed: u64) -> f64 {
    let denominator = completed + failed;
    if denominator == 0 {
        1.0
    } else {
        completed as f64 / denominator as f64
    }
}
