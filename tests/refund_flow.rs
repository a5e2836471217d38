//! End-to-end refund lifecycle tests
//!
//! Exercises the public API the way the operator dashboard drives it:
//! urgency triage, single refunds with retry rejection, manual overrides,
//! and batch remediation with isolated failures.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use refund_core::{
    classify, AdminUserId, AuditAction, AuditLedger, AuditQuery, BatchConfig, BatchOutcome,
    BatchProcessor, Booking, BookingId, BookingStatus, BookingStore, GatewayError, GatewayReceipt,
    InMemoryAuditLedger, InMemoryBookingStore, PaymentId, RefundConfig, RefundError, RefundGateway,
    RefundService, ReportingAggregator, SlaConfig, Urgency,
};

/// Gateway double that fails for a configurable set of bookings
struct ScriptedGateway {
    failing: Vec<BookingId>,
}

impl ScriptedGateway {
    fn reliable() -> Self {
        Self { failing: vec![] }
    }

    fn failing_for(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|s| BookingId::new(*s)).collect(),
        }
    }
}

#[async_trait]
impl RefundGateway for ScriptedGateway {
    async fn refund(
        &self,
        booking_id: &BookingId,
        _amount: Decimal,
    ) -> Result<GatewayReceipt, GatewayError> {
        if self.failing.contains(booking_id) {
            Err(GatewayError::Declined("insufficient provider balance".into()))
        } else {
            Ok(GatewayReceipt {
                gateway_reference: format!("GW-{}", uuid::Uuid::new_v4()),
            })
        }
    }
}

fn cancelled_booking(id: &str, price: i64, hours_ago: i64) -> Booking {
    Booking {
        id: BookingId::new(id),
        status: BookingStatus::Cancelled,
        service_price: Decimal::new(price, 0),
        payment_id: Some(PaymentId::new(format!("pay_{}", id))),
        updated_at: Utc::now() - Duration::hours(hours_ago),
        slot: None,
    }
}

struct World {
    service: Arc<RefundService>,
    store: Arc<InMemoryBookingStore>,
    ledger: Arc<InMemoryAuditLedger>,
}

fn world(gateway: ScriptedGateway) -> World {
    let store = Arc::new(InMemoryBookingStore::new());
    let ledger = Arc::new(InMemoryAuditLedger::new());
    let service = Arc::new(
        RefundService::builder()
            .store(store.clone())
            .ledger(ledger.clone())
            .gateway(Arc::new(gateway))
            .config(RefundConfig::default())
            .build()
            .unwrap(),
    );
    World {
        service,
        store,
        ledger,
    }
}

fn admin() -> AdminUserId {
    AdminUserId::new("admin:dana")
}

#[tokio::test]
async fn aging_cancelled_booking_is_refunded_once() {
    let w = world(ScriptedGateway::reliable());
    let b1 = cancelled_booking("B1", 500, 30);
    w.store.insert(b1.clone()).await;

    // thirty hours old: triage flags it critical
    assert_eq!(
        classify(&b1, Utc::now(), &SlaConfig::default()),
        Urgency::Critical
    );

    let updated = w
        .service
        .process_refund(&BookingId::new("B1"), Decimal::new(500, 0), &admin())
        .await
        .unwrap();
    assert_eq!(updated.status, BookingStatus::RefundInitiated);

    let trail = w
        .ledger
        .entries_for_booking(&BookingId::new("B1"))
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, AuditAction::RefundProcessed);
    assert_eq!(trail[0].refund_amount, Some(Decimal::new(500, 0)));
    assert_eq!(trail[0].previous_status, Some(BookingStatus::Cancelled));
    assert_eq!(trail[0].new_status, Some(BookingStatus::RefundInitiated));

    // a second attempt is rejected outright: the booking is no longer in a
    // refundable state, and no new trail entry appears
    let err = w
        .service
        .process_refund(&BookingId::new("B1"), Decimal::new(500, 0), &admin())
        .await
        .unwrap_err();
    assert!(matches!(err, RefundError::NotRefundable { .. }));
    assert_eq!(w.ledger.len().await, 1);

    // once initiated, the case keeps aging from its new updated_at
    let refreshed = w
        .store
        .get(&BookingId::new("B1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        classify(&refreshed, Utc::now(), &SlaConfig::default()),
        Urgency::Normal
    );
}

#[tokio::test]
async fn operator_override_closes_a_case() {
    let w = world(ScriptedGateway::reliable());
    let mut b2 = cancelled_booking("B2", 350, 2);
    b2.status = BookingStatus::RefundInitiated;
    w.store.insert(b2).await;

    let updated = w
        .service
        .override_status(
            &BookingId::new("B2"),
            BookingStatus::RefundCompleted,
            "manually confirmed by bank statement",
            &admin(),
        )
        .await
        .unwrap();
    assert_eq!(updated.status, BookingStatus::RefundCompleted);

    let trail = w
        .ledger
        .entries_for_booking(&BookingId::new("B2"))
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, AuditAction::StatusOverride);
    assert_eq!(trail[0].previous_status, Some(BookingStatus::RefundInitiated));
    assert_eq!(trail[0].new_status, Some(BookingStatus::RefundCompleted));
    assert_eq!(trail[0].refund_amount, None);
    assert_eq!(
        trail[0].note.as_deref(),
        Some("manually confirmed by bank statement")
    );
}

#[tokio::test]
async fn failed_attempt_keeps_booking_actionable_for_retry() {
    let w = world(ScriptedGateway::failing_for(&["B3"]));
    w.store.insert(cancelled_booking("B3", 200, 5)).await;

    let err = w
        .service
        .process_refund(&BookingId::new("B3"), Decimal::new(200, 0), &admin())
        .await
        .unwrap_err();
    assert!(err.is_gateway());

    // the failure is in the trail, but the visible status never moved
    let booking = w
        .store
        .get(&BookingId::new("B3"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);

    let trail = w
        .ledger
        .entries_for_booking(&BookingId::new("B3"))
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, AuditAction::RefundFailed);
    assert_eq!(trail[0].new_status, None);
    assert!(trail[0]
        .note
        .as_deref()
        .unwrap()
        .contains("insufficient provider balance"));

    // retry through a now-reliable path succeeds and leaves two entries
    let retry_world = World {
        service: Arc::new(
            RefundService::builder()
                .store(w.store.clone())
                .ledger(w.ledger.clone())
                .gateway(Arc::new(ScriptedGateway::reliable()))
                .build()
                .unwrap(),
        ),
        store: w.store.clone(),
        ledger: w.ledger.clone(),
    };
    retry_world
        .service
        .process_refund(&BookingId::new("B3"), Decimal::new(200, 0), &admin())
        .await
        .unwrap();

    let trail = retry_world
        .ledger
        .entries_for_booking(&BookingId::new("B3"))
        .await
        .unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0].action, AuditAction::RefundProcessed);
    assert_eq!(trail[1].action, AuditAction::RefundFailed);
}

#[tokio::test]
async fn batch_run_isolates_the_failing_item() {
    let w = world(ScriptedGateway::failing_for(&["B5"]));
    for (id, price) in [("B4", 100), ("B5", 200), ("B6", 300)] {
        w.store.insert(cancelled_booking(id, price, 26)).await;
    }

    let processor = BatchProcessor::new(w.service.clone(), BatchConfig::default());
    let outcome = processor
        .run(
            &[
                BookingId::new("B4"),
                BookingId::new("B5"),
                BookingId::new("B6"),
            ],
            &admin(),
        )
        .await;

    assert_eq!(
        outcome,
        BatchOutcome {
            succeeded: 2,
            failed: 1
        }
    );

    for (id, expected) in [
        ("B4", BookingStatus::RefundInitiated),
        ("B5", BookingStatus::Cancelled),
        ("B6", BookingStatus::RefundInitiated),
    ] {
        let booking = w.store.get(&BookingId::new(id)).await.unwrap().unwrap();
        assert_eq!(booking.status, expected, "booking {}", id);
    }

    // batch successes carry the batch action tag; reporting sees everything
    let aggregator = ReportingAggregator::new(w.ledger.clone());
    let entries = aggregator.filtered_audit(None, None).await.unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(
        entries
            .iter()
            .filter(|e| e.action == AuditAction::BatchRefundProcessed)
            .count(),
        2
    );
    assert_eq!(
        entries
            .iter()
            .filter(|e| e.action == AuditAction::RefundFailed)
            .count(),
        1
    );

    // full-price amounts were used
    let b4_trail = w
        .ledger
        .entries_for_booking(&BookingId::new("B4"))
        .await
        .unwrap();
    assert_eq!(b4_trail[0].refund_amount, Some(Decimal::new(100, 0)));
}

#[tokio::test]
async fn monthly_summary_reflects_store_snapshot() {
    let w = world(ScriptedGateway::reliable());
    w.store.insert(cancelled_booking("B7", 500, 1)).await;
    w.service
        .process_refund(&BookingId::new("B7"), Decimal::new(500, 0), &admin())
        .await
        .unwrap();
    w.service
        .override_status(
            &BookingId::new("B7"),
            BookingStatus::RefundCompleted,
            "confirmed against provider dashboard",
            &admin(),
        )
        .await
        .unwrap();

    let aggregator = ReportingAggregator::new(w.ledger.clone());
    let bookings = w.store.bookings().await;
    let summaries = aggregator.monthly_summary(&bookings, 1, Utc::now());

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].case_count, 1);
    assert_eq!(summaries[0].breakdown.completed, 1);
    assert_eq!(summaries[0].total_refunds, Decimal::new(500, 0));
    assert_eq!(summaries[0].average_refund, Decimal::new(500, 0));

    // two trail entries for the case, newest first
    let trail = w
        .ledger
        .entries(AuditQuery::default())
        .await
        .unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0].action, AuditAction::StatusOverride);
    assert_eq!(trail[1].action, AuditAction::RefundProcessed);
}
