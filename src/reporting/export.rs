//! Export row projections
//!
//! The data each export surface must contain, as serializable rows. File
//! format mechanics (CSV/PDF) are downstream concerns.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{AdminUserId, AuditAction, AuditLogEntry, BookingId, BookingStatus};

use super::summary::MonthlySummary;

/// Operator display data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    pub name: String,
    pub email: String,
}

/// Booking display data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDescriptor {
    pub salon_name: String,
    pub service_name: String,
}

/// Display lookups joined into export rows
///
/// Entries with no matching lookup still export, with the display columns
/// left empty.
#[derive(Debug, Clone, Default)]
pub struct ExportDirectory {
    pub admins: HashMap<AdminUserId, AdminProfile>,
    pub bookings: HashMap<BookingId, BookingDescriptor>,
}

/// One export row per audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditExportRow {
    pub timestamp: DateTime<Utc>,
    pub admin_name: String,
    pub admin_email: String,
    pub booking_id: String,
    pub salon_name: String,
    pub service_name: String,
    pub action: AuditAction,
    pub previous_status: Option<BookingStatus>,
    pub new_status: Option<BookingStatus>,
    pub refund_amount: Option<Decimal>,
    pub note: String,
}

/// Project ledger entries into export rows
pub fn audit_export_rows(
    entries: &[AuditLogEntry],
    directory: &ExportDirectory,
) -> Vec<AuditExportRow> {
    entries
        .iter()
        .map(|entry| {
            let admin = directory.admins.get(&entry.admin_user_id);
            let booking = directory.bookings.get(&entry.booking_id);

            AuditExportRow {
                timestamp: entry.created_at,
                admin_name: admin.map(|a| a.name.clone()).unwrap_or_default(),
                admin_email: admin.map(|a| a.email.clone()).unwrap_or_default(),
                booking_id: entry.booking_id.to_string(),
                salon_name: booking.map(|b| b.salon_name.clone()).unwrap_or_default(),
                service_name: booking.map(|b| b.service_name.clone()).unwrap_or_default(),
                action: entry.action,
                previous_status: entry.previous_status,
                new_status: entry.new_status,
                refund_amount: entry.refund_amount,
                note: entry.note.clone().unwrap_or_default(),
            }
        })
        .collect()
}

/// One export row per summarized month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryExportRow {
    pub month: String,
    pub case_count: u32,
    pub total_amount: Decimal,
    pub average_amount: Decimal,
    pub initiated: u32,
    pub processed: u32,
    pub completed: u32,
    pub failed: u32,
}

/// Project monthly summaries into export rows
pub fn summary_export_rows(summaries: &[MonthlySummary]) -> Vec<SummaryExportRow> {
    summaries
        .iter()
        .map(|s| SummaryExportRow {
            month: s.label(),
            case_count: s.case_count,
            total_amount: s.total_refunds,
            average_amount: s.average_refund,
            initiated: s.breakdown.initiated,
            processed: s.breakdown.processed,
            completed: s.breakdown.completed,
            failed: s.breakdown.failed,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::summary::StatusBreakdown;

    fn entry(id: u64, booking: &str, admin: &str) -> AuditLogEntry {
        AuditLogEntry {
            id,
            booking_id: BookingId::new(booking),
            admin_user_id: AdminUserId::new(admin),
            action: AuditAction::RefundProcessed,
            previous_status: Some(BookingStatus::Cancelled),
            new_status: Some(BookingStatus::RefundInitiated),
            refund_amount: Some(Decimal::new(500, 0)),
            note: Some("gateway accepted refund, reference GW-1".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_rows_join_directory_data() {
        let mut directory = ExportDirectory::default();
        directory.admins.insert(
            AdminUserId::new("admin:1"),
            AdminProfile {
                name: "Dana Ops".to_string(),
                email: "dana@example.com".to_string(),
            },
        );
        directory.bookings.insert(
            BookingId::new("bkg_001"),
            BookingDescriptor {
                salon_name: "Shear Genius".to_string(),
                service_name: "Color treatment".to_string(),
            },
        );

        let rows = audit_export_rows(&[entry(1, "bkg_001", "admin:1")], &directory);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].admin_name, "Dana Ops");
        assert_eq!(rows[0].admin_email, "dana@example.com");
        assert_eq!(rows[0].salon_name, "Shear Genius");
        assert_eq!(rows[0].service_name, "Color treatment");
        assert_eq!(rows[0].booking_id, "bkg_001");
        assert_eq!(rows[0].refund_amount, Some(Decimal::new(500, 0)));
    }

    #[test]
    fn test_missing_lookups_export_blank_columns() {
        let rows = audit_export_rows(
            &[entry(1, "bkg_unknown", "admin:unknown")],
            &ExportDirectory::default(),
        );
        assert_eq!(rows[0].admin_name, "");
        assert_eq!(rows[0].salon_name, "");
        assert_eq!(rows[0].note, "gateway accepted refund, reference GW-1");
    }

    #[test]
    fn test_summary_rows() {
        let summary = MonthlySummary {
            year: 2026,
            month: 8,
            case_count: 3,
            total_refunds: Decimal::new(800, 0),
            average_refund: Decimal::new(400, 0),
            breakdown: StatusBreakdown {
                initiated: 1,
                processed: 1,
                completed: 1,
                failed: 0,
            },
        };

        let rows = summary_export_rows(&[summary]);
        assert_eq!(rows[0].month, "2026-08");
        assert_eq!(rows[0].case_count, 3);
        assert_eq!(rows[0].total_amount, Decimal::new(800, 0));
        assert_eq!(rows[0].completed, 1);
    }
}
