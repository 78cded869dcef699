use crate::model::{
    id::ReservationId,
    reservation::{Area, Reservation, ReservationStatus, TimeSlot},
};
use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;

/// A validated submission ready to be persisted in the `pending` state.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct CreateReservation {
    pub requester_name: String,
    pub requester_email: String,
    pub area: Area,
    pub date: NaiveDate,
    pub start_time: TimeSlot,
    pub end_time: TimeSlot,
    pub created_at: DateTime<Utc>,
}

/// Moves a `pending` reservation to a terminal status. Stores apply it only
/// while the record is still `pending`.
#[derive(Debug, Clone, new)]
pub struct UpdateReservationStatus {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
    pub decided_at: DateTime<Utc>,
}

impl CreateReservation {
    /// The record a store holds right after assigning `reservation_id`.
    pub fn into_reservation(self, reservation_id: ReservationId) -> Reservation {
        let CreateReservation {
            requester_name,
            requester_email,
            area,
            date,
            start_time,
            end_time,
            created_at,
        } = self;
        Reservation {
            reservation_id,
            requester_name,
            requester_email,
            area,
            date,
            start_time,
            end_time,
            status: ReservationStatus::Pending,
            created_at,
            confirmed_at: None,
            rejected_at: None,
        }
    }

    /// A pending or confirmed `existing` record whose window overlaps this one.
    pub fn clashes_with(&self, existing: &Reservation) -> bool {
        existing.status != ReservationStatus::Rejected
            && existing.overlaps(self.area, self.date, self.start_time, self.end_time)
    }
}

impl UpdateReservationStatus {
    /// Applies the transition to an in-memory copy of the record.
    pub fn apply_to(&self, reservation: &mut Reservation) {
        reservation.status = self.status;
        match self.status {
            ReservationStatus::Confirmed => reservation.confirmed_at = Some(self.decided_at),
            ReservationStatus::Rejected => reservation.rejected_at = Some(self.decided_at),
            ReservationStatus::Pending => {}
        }
    }
}
