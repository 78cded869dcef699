use crate::model::{
    id::ReservationId,
    reservation::{
        criteria::{ReservationFilter, ReservationOrder},
        event::{CreateReservation, UpdateReservationStatus},
        Reservation,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // Stores a new pending reservation and returns the id assigned to it
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId>;
    // Same as create, but fails with ReservationConflict when a pending or
    // confirmed reservation overlaps the window. Check and insert are atomic
    async fn create_exclusive(&self, event: CreateReservation) -> AppResult<ReservationId>;
    // Applies only while the record is still pending.
    // Unknown id -> EntityNotFound, any other status -> InvalidTransition
    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<()>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    // Equality filters combined with AND, in the requested order
    async fn find(
        &self,
        filter: ReservationFilter,
        order: ReservationOrder,
    ) -> AppResult<Vec<Reservation>>;
}
