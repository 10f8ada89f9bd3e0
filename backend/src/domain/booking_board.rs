use shared::{CancelTransition, WriteState};
use tracing::{debug, warn};

use crate::domain::models::Booking;

/// One booking in the caller's list together with its write progress
#[derive(Debug, Clone, PartialEq)]
pub struct BoardEntry {
    pub booking: Booking,
    pub write_state: WriteState,
    pub error: Option<String>,
}

impl BoardEntry {
    fn new(booking: Booking) -> Self {
        Self {
            booking,
            write_state: WriteState::Idle,
            error: None,
        }
    }

    /// Cancel is offered only for pending bookings with no write in flight
    pub fn can_cancel(&self) -> bool {
        self.booking.is_pending() && self.write_state != WriteState::PendingWrite
    }
}

/// Handle for a cancel that has been started but not yet resolved.
///
/// Holds the entry as it was before the write so a failure can restore it.
#[derive(Debug)]
pub struct PendingCancel {
    index: usize,
    previous: Booking,
}

/// The caller's bookings, in store order.
///
/// A cancel moves one entry through `idle -> pending_write -> committed | failed`.
/// The entry is only replaced once the store has acknowledged the write; a
/// failed write leaves the booking exactly as it was and attaches the error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookingBoard {
    entries: Vec<BoardEntry>,
}

impl BookingBoard {
    pub fn new(bookings: Vec<Booking>) -> Self {
        Self {
            entries: bookings.into_iter().map(BoardEntry::new).collect(),
        }
    }

    pub fn entries(&self) -> &[BoardEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<BoardEntry> {
        self.entries
    }

    pub fn get(&self, booking_id: &str) -> Option<&BoardEntry> {
        self.entries.iter().find(|entry| entry.booking.id == booking_id)
    }

    /// Mark an entry as having a write in flight.
    ///
    /// Returns `None` if the booking is not on the board or already has a
    /// write outstanding.
    pub fn begin_cancel(&mut self, booking_id: &str) -> Option<PendingCancel> {
        let index = self.entries.iter().position(|entry| entry.booking.id == booking_id)?;
        let entry = &mut self.entries[index];

        if entry.write_state == WriteState::PendingWrite {
            debug!("Cancel already in flight for booking {}", booking_id);
            return None;
        }

        entry.write_state = WriteState::PendingWrite;
        entry.error = None;

        Some(PendingCancel {
            index,
            previous: entry.booking.clone(),
        })
    }

    /// Apply the store's acknowledged document to the entry
    pub fn commit(&mut self, pending: PendingCancel, stored: Booking) -> CancelTransition {
        let booking_id = pending.previous.id.clone();
        let entry = &mut self.entries[pending.index];

        entry.booking = stored;
        entry.write_state = WriteState::Committed;
        entry.error = None;

        CancelTransition::Committed { booking_id }
    }

    /// Leave the entry unchanged and surface the error on it
    pub fn fail(&mut self, pending: PendingCancel, message: impl Into<String>) -> CancelTransition {
        let message = message.into();
        let booking_id = pending.previous.id.clone();
        warn!("Cancel of booking {} failed: {}", booking_id, message);

        let entry = &mut self.entries[pending.index];
        entry.booking = pending.previous;
        entry.write_state = WriteState::Failed;
        entry.error = Some(message.clone());

        CancelTransition::Failed { booking_id, message }
    }
}
