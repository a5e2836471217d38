//! Refund State Machine
//!
//! Validates and executes single-booking status transitions, coordinating
//! the audit ledger and the refund gateway. Every attempt that passes
//! validation writes exactly one ledger entry, success or failure; a
//! rejected attempt writes nothing and contacts nothing.

mod builder;

pub use builder::RefundServiceBuilder;

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::RefundConfig;
use crate::error::{RefundError, RefundResult};
use crate::gateway::{GatewayError, RefundGateway};
use crate::ledger::AuditLedger;
use crate::store::BookingStore;
use crate::types::{AdminUserId, AuditAction, AuditDraft, Booking, BookingId, BookingStatus};

/// How a refund attempt was initiated; decides the audit action tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefundOrigin {
    Single,
    Batch,
}

/// Refund lifecycle service
///
/// Read-modify-write against one booking at a time, with no lock held by
/// the core: a last-writer-wins race on the status field is tolerated
/// because the append-only ledger preserves full history regardless of race
/// outcomes, and any operator can re-query and retry.
pub struct RefundService {
    store: Arc<dyn BookingStore>,
    ledger: Arc<dyn AuditLedger>,
    gateway: Arc<dyn RefundGateway>,
    config: RefundConfig,
}

impl RefundService {
    /// Create a service from its collaborators
    pub fn new(
        store: Arc<dyn BookingStore>,
        ledger: Arc<dyn AuditLedger>,
        gateway: Arc<dyn RefundGateway>,
        config: RefundConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            gateway,
            config,
        }
    }

    /// Create a builder
    pub fn builder() -> RefundServiceBuilder {
        RefundServiceBuilder::new()
    }

    /// Get the active configuration
    pub fn config(&self) -> &RefundConfig {
        &self.config
    }

    /// Process a refund of `amount` for one booking
    ///
    /// Preconditions: the booking exists, its status is cancelled or
    /// refund_failed, it has a payment reference, and
    /// `0 < amount <= service_price`. A precondition failure is returned as
    /// a validation error with no gateway call and no ledger entry.
    ///
    /// On gateway success the booking advances to refund_initiated and the
    /// updated record is returned. On gateway failure the booking status is
    /// left as-is, the failure is recorded in the ledger, and the gateway
    /// error is returned for operator display and retry.
    pub async fn process_refund(
        &self,
        booking_id: &BookingId,
        amount: Decimal,
        admin: &AdminUserId,
    ) -> RefundResult<Booking> {
        self.execute_refund(booking_id, Some(amount), RefundOrigin::Single, admin)
            .await
    }

    /// Process a full-price refund as one item of a batch run
    pub(crate) async fn process_refund_for_batch(
        &self,
        booking_id: &BookingId,
        admin: &AdminUserId,
    ) -> RefundResult<Booking> {
        self.execute_refund(booking_id, None, RefundOrigin::Batch, admin)
            .await
    }

    /// Manually override a booking's status, bypassing the gateway
    ///
    /// No monetary precondition; fails only when the booking does not exist
    /// or persistence is unavailable. The override entry is appended before
    /// the status change is applied, so a ledger fault aborts the override
    /// with the booking untouched.
    pub async fn override_status(
        &self,
        booking_id: &BookingId,
        new_status: BookingStatus,
        note: impl Into<String>,
        admin: &AdminUserId,
    ) -> RefundResult<Booking> {
        let booking = self.fetch(booking_id).await?;
        let note = note.into();

        let draft = AuditDraft::new(
            booking_id.clone(),
            admin.clone(),
            AuditAction::StatusOverride,
        )
        .statuses(Some(booking.status), Some(new_status))
        .note(note);
        self.ledger.append(draft).await?;

        let updated = self.store.update_status(booking_id, new_status, None).await?;

        info!(
            booking_id = %booking_id,
            previous_status = %booking.status,
            new_status = %new_status,
            admin = %admin,
            "booking status overridden"
        );

        Ok(updated)
    }

    async fn fetch(&self, booking_id: &BookingId) -> RefundResult<Booking> {
        self.store
            .get(booking_id)
            .await?
            .ok_or_else(|| RefundError::BookingNotFound(booking_id.clone()))
    }

    async fn execute_refund(
        &self,
        booking_id: &BookingId,
        amount: Option<Decimal>,
        origin: RefundOrigin,
        admin: &AdminUserId,
    ) -> RefundResult<Booking> {
        // Step 1: validate; nothing is written and the gateway is not
        // contacted for a rejected attempt
        let booking = self.fetch(booking_id).await?;

        if !booking.status.refundable() {
            return Err(RefundError::NotRefundable {
                id: booking_id.clone(),
                status: booking.status,
            });
        }
        if booking.payment_id.is_none() {
            return Err(RefundError::MissingPayment {
                id: booking_id.clone(),
            });
        }

        let amount = amount.unwrap_or(booking.service_price);
        if amount <= Decimal::ZERO || amount > booking.service_price {
            return Err(RefundError::AmountOutOfRange {
                amount,
                service_price: booking.service_price,
            });
        }

        // Step 2: gateway call, bounded by the configured deadline; no
        // response is failure, never success
        let outcome = match tokio::time::timeout(
            self.config.gateway_timeout(),
            self.gateway.refund(booking_id, amount),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout {
                timeout_secs: self.config.gateway_timeout_secs,
            }),
        };

        // Step 3: record the attempt and apply the transition
        match outcome {
            Err(gateway_err) => {
                warn!(
                    booking_id = %booking_id,
                    amount = %amount,
                    error = %gateway_err,
                    "gateway refund failed"
                );

                let draft = AuditDraft::new(
                    booking_id.clone(),
                    admin.clone(),
                    AuditAction::RefundFailed,
                )
                .statuses(Some(booking.status), None)
                .amount(amount)
                .note(gateway_err.to_string());

                // No money moved; a lost failure record must not mask the
                // gateway error the operator needs for the retry decision
                if let Err(ledger_err) = self.ledger.append(draft).await {
                    error!(
                        booking_id = %booking_id,
                        error = %ledger_err,
                        "failed to record refund failure in audit ledger"
                    );
                }

                Err(gateway_err.into())
            }
            Ok(receipt) => {
                let (action, note) = match origin {
                    RefundOrigin::Single => (
                        AuditAction::RefundProcessed,
                        format!(
                            "gateway accepted refund, reference {}",
                            receipt.gateway_reference
                        ),
                    ),
                    RefundOrigin::Batch => (
                        AuditAction::BatchRefundProcessed,
                        "processed as part of batch refund".to_string(),
                    ),
                };

                let draft = AuditDraft::new(booking_id.clone(), admin.clone(), action)
                    .statuses(Some(booking.status), Some(BookingStatus::RefundInitiated))
                    .amount(amount)
                    .note(note);

                // The money has already moved; a ledger fault here is
                // escalated, never rolled back
                if let Err(ledger_err) = self.ledger.append(draft).await {
                    error!(
                        booking_id = %booking_id,
                        gateway_reference = %receipt.gateway_reference,
                        error = %ledger_err,
                        "audit write failed after successful gateway refund"
                    );
                }

                let updated = self
                    .store
                    .update_status(booking_id, BookingStatus::RefundInitiated, None)
                    .await?;

                info!(
                    booking_id = %booking_id,
                    amount = %amount,
                    gateway_reference = %receipt.gateway_reference,
                    admin = %admin,
                    "refund initiated"
                );

                Ok(updated)
            }
        }
    }
}
