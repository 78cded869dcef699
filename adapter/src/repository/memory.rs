//! Process-local stores for running without PostgreSQL.
//!
//! Each store keeps its records behind one `RwLock`, so a status update reads
//! and writes the record under the same write guard.

use async_trait::async_trait;
use kernel::{
    model::{
        id::ReservationId,
        reservation::{
            criteria::{ReservationFilter, ReservationOrder, SortDirection, SortKey},
            event::{CreateReservation, UpdateReservationStatus},
            Reservation,
        },
    },
    repository::{
        email_log::{EmailLogEntry, EmailLogRepository},
        health::HealthCheckRepository,
        reservation::ReservationRepository,
    },
    service::conflict::overlap_conflict,
};
use shared::error::{AppError, AppResult};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryReservationRepository {
    records: RwLock<Vec<Reservation>>,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let reservation_id = ReservationId::new();
        self.records
            .write()
            .await
            .push(event.into_reservation(reservation_id));
        Ok(reservation_id)
    }

    async fn create_exclusive(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let mut records = self.records.write().await;
        if let Some(existing) = records.iter().find(|r| event.clashes_with(r)) {
            return Err(overlap_conflict(existing));
        }
        let reservation_id = ReservationId::new();
        records.push(event.into_reservation(reservation_id));
        Ok(reservation_id)
    }

    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<()> {
        let mut records = self.records.write().await;
        let reservation = records
            .iter_mut()
            .find(|r| r.reservation_id == event.reservation_id)
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("reservation {}", event.reservation_id))
            })?;

        if !reservation.status.can_transition_to(event.status) {
            return Err(AppError::InvalidTransition {
                reservation_id: event.reservation_id.to_string(),
                current: reservation.status.to_string(),
                target: event.status.to_string(),
            });
        }
        event.apply_to(reservation);
        Ok(())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.reservation_id == reservation_id)
            .cloned())
    }

    async fn find(
        &self,
        filter: ReservationFilter,
        order: ReservationOrder,
    ) -> AppResult<Vec<Reservation>> {
        let mut items: Vec<Reservation> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        match order.key {
            SortKey::CreatedAt => items.sort_by(|a, b| {
                (a.created_at, a.reservation_id).cmp(&(b.created_at, b.reservation_id))
            }),
        }
        if order.direction == SortDirection::Descending {
            items.reverse();
        }
        Ok(items)
    }
}

#[derive(Default)]
pub struct InMemoryEmailLogRepository {
    entries: RwLock<Vec<EmailLogEntry>>,
}

impl InMemoryEmailLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmailLogRepository for InMemoryEmailLogRepository {
    async fn record(&self, entry: EmailLogEntry) -> AppResult<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn find_by_reservation_id(
        &self,
        reservation_id: ReservationId,
    ) -> AppResult<Vec<EmailLogEntry>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.reservation_id == reservation_id)
            .cloned()
            .collect())
    }
}

/// There is no external database to lose.
pub struct InMemoryHealthCheck;

#[async_trait]
impl HealthCheckRepository for InMemoryHealthCheck {
    async fn check_db(&self) -> bool {
        true
    }
}
