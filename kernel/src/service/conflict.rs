use crate::{
    model::reservation::{
        criteria::{ReservationFilter, ReservationOrder},
        event::CreateReservation,
        Reservation,
    },
    repository::reservation::ReservationRepository,
};
use async_trait::async_trait;
use derive_new::new;
use shared::error::{AppError, AppResult};
use std::sync::Arc;

/// Hook run on a validated submission before it is persisted.
#[async_trait]
pub trait ConflictCheck: Send + Sync {
    async fn check(&self, candidate: &CreateReservation) -> AppResult<()>;

    /// Whether the insert itself must repeat the check atomically, through
    /// `ReservationRepository::create_exclusive`.
    fn exclusive_insert(&self) -> bool {
        false
    }
}

/// Accepts every submission; overlapping requests are left to the approver.
pub struct AllowOverlaps;

#[async_trait]
impl ConflictCheck for AllowOverlaps {
    async fn check(&self, _candidate: &CreateReservation) -> AppResult<()> {
        Ok(())
    }
}

/// Refuses a submission whose window overlaps a pending or confirmed
/// reservation of the same area on the same date.
///
/// `check` rejects early; the store repeats it inside the insert so two
/// racing submissions cannot both pass.
#[derive(new)]
pub struct RejectOverlaps {
    repository: Arc<dyn ReservationRepository>,
}

#[async_trait]
impl ConflictCheck for RejectOverlaps {
    async fn check(&self, candidate: &CreateReservation) -> AppResult<()> {
        let filter = ReservationFilter {
            area: Some(candidate.area),
            date: Some(candidate.date),
            start_time: None,
        };
        let existing = self
            .repository
            .find(filter, ReservationOrder::NEWEST_FIRST)
            .await?;

        match existing.iter().find(|r| candidate.clashes_with(r)) {
            None => Ok(()),
            Some(r) => Err(overlap_conflict(r)),
        }
    }

    fn exclusive_insert(&self) -> bool {
        true
    }
}

/// The error reported when `existing` already holds the requested window.
pub fn overlap_conflict(existing: &Reservation) -> AppError {
    AppError::ReservationConflict(format!(
        "{} is already reserved on {} from {} to {} ({})",
        existing.area,
        existing.date,
        existing.start_time,
        existing.end_time,
        existing.reservation_id.reference_code()
    ))
}
