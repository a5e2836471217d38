//! Booking Record Store contract
//!
//! The store is an external, already-consistent service; the core reads one
//! booking at a time and writes status updates through a narrow seam. The
//! in-memory implementation backs tests and embedded use.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{RefundError, RefundResult};
use crate::types::{Booking, BookingId, BookingSlot, BookingStatus};

/// Booking record store
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Fetch one booking by id
    async fn get(&self, id: &BookingId) -> RefundResult<Option<Booking>>;

    /// Update a booking's status, optionally rescheduling its slot
    ///
    /// Bumps `updated_at` and returns the stored record. A missing booking
    /// is an error, not an upsert.
    async fn update_status(
        &self,
        id: &BookingId,
        new_status: BookingStatus,
        reschedule: Option<BookingSlot>,
    ) -> RefundResult<Booking>;
}

/// In-memory booking store
pub struct InMemoryBookingStore {
    bookings: RwLock<HashMap<BookingId, Booking>>,
}

impl InMemoryBookingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            bookings: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a booking
    pub async fn insert(&self, booking: Booking) {
        let mut bookings = self.bookings.write().await;
        bookings.insert(booking.id.clone(), booking);
    }

    /// Snapshot of every stored booking, in no particular order
    pub async fn bookings(&self) -> Vec<Booking> {
        let bookings = self.bookings.read().await;
        bookings.values().cloned().collect()
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn get(&self, id: &BookingId) -> RefundResult<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &BookingId,
        new_status: BookingStatus,
        reschedule: Option<BookingSlot>,
    ) -> RefundResult<Booking> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(id)
            .ok_or_else(|| RefundError::BookingNotFound(id.clone()))?;

        booking.status = new_status;
        booking.updated_at = Utc::now();
        if let Some(slot) = reschedule {
            booking.slot = Some(slot);
        }

        Ok(booking.clone())
    }
}
