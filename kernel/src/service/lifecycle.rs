//! Submission and approval of reservations.
//!
//! Every state change is persisted first and announced second: the notifier
//! is only called once the store has acknowledged the write, and a failed
//! notification never undoes that write.

use crate::{
    model::{
        id::ReservationId,
        reservation::{
            event::UpdateReservationStatus, request::SubmitReservation, Reservation,
            ReservationStatus,
        },
    },
    notification::{NotificationKind, NotificationPayload, ReservationNotifier},
    repository::{
        email_log::{EmailLogEntry, EmailLogRepository},
        reservation::ReservationRepository,
    },
    service::{bounded, conflict::ConflictCheck},
};
use chrono::{Local, Utc};
use derive_new::new;
use shared::{
    config::LifecycleConfig,
    error::{AppError, AppResult},
};
use std::sync::Arc;

#[derive(new)]
pub struct ReservationLifecycle {
    repository: Arc<dyn ReservationRepository>,
    notifier: Arc<dyn ReservationNotifier>,
    email_log: Arc<dyn EmailLogRepository>,
    conflict_check: Arc<dyn ConflictCheck>,
    config: LifecycleConfig,
}

impl ReservationLifecycle {
    /// Validates and stores a new `pending` reservation, then sends the
    /// `submitted` notification.
    ///
    /// When only the notification fails the reservation stays stored and the
    /// error is `NotificationDispatchFailed` carrying its id.
    #[tracing::instrument(skip_all)]
    pub async fn submit(&self, request: SubmitReservation) -> AppResult<Reservation> {
        let event = request.validate(Local::now().date_naive(), Utc::now())?;

        bounded(
            "conflict check",
            self.config.store_timeout,
            self.conflict_check.check(&event),
        )
        .await?;

        let insert = if self.conflict_check.exclusive_insert() {
            self.repository.create_exclusive(event.clone())
        } else {
            self.repository.create(event.clone())
        };
        let reservation_id = bounded("store insert", self.config.store_timeout, insert).await?;
        let reservation = event.into_reservation(reservation_id);
        tracing::info!(
            %reservation_id,
            area = %reservation.area,
            date = %reservation.date,
            "reservation submitted"
        );

        self.dispatch(NotificationKind::Submitted, &reservation).await?;
        Ok(reservation)
    }

    /// Moves a `pending` reservation to `target`, then notifies the requester.
    #[tracing::instrument(skip(self))]
    pub async fn transition(
        &self,
        reservation_id: ReservationId,
        target: ReservationStatus,
    ) -> AppResult<Reservation> {
        let mut reservation = self.find(reservation_id).await?;
        if !reservation.status.can_transition_to(target) {
            return Err(AppError::InvalidTransition {
                reservation_id: reservation_id.to_string(),
                current: reservation.status.to_string(),
                target: target.to_string(),
            });
        }

        let event = UpdateReservationStatus::new(reservation_id, target, Utc::now());
        bounded(
            "store update",
            self.config.store_timeout,
            self.repository.update_status(event.clone()),
        )
        .await?;
        event.apply_to(&mut reservation);
        tracing::info!(%reservation_id, status = %target, "reservation decided");

        self.dispatch(NotificationKind::for_status(target), &reservation).await?;
        Ok(reservation)
    }

    pub async fn find(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        bounded(
            "store read",
            self.config.store_timeout,
            self.repository.find_by_id(reservation_id),
        )
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("reservation {reservation_id}")))
    }

    /// Notifications already delivered for a reservation, oldest first.
    pub async fn notification_log(
        &self,
        reservation_id: ReservationId,
    ) -> AppResult<Vec<EmailLogEntry>> {
        self.find(reservation_id).await?;
        bounded(
            "email log read",
            self.config.store_timeout,
            self.email_log.find_by_reservation_id(reservation_id),
        )
        .await
    }

    async fn dispatch(&self, kind: NotificationKind, reservation: &Reservation) -> AppResult<()> {
        let payload = NotificationPayload::from(reservation);
        let recipient = reservation.requester_email.as_str();

        let mut retries_left = self.config.notify_retries;
        loop {
            let sent = bounded(
                "notification dispatch",
                self.config.notify_timeout,
                self.notifier.notify(kind, recipient, &payload),
            )
            .await;
            match sent {
                Ok(()) => break,
                Err(e) if e.is_retryable() && retries_left > 0 => {
                    retries_left -= 1;
                    tracing::warn!(
                        reservation_id = %reservation.reservation_id,
                        %kind,
                        error.message = %e,
                        "notification failed, retrying"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        reservation_id = %reservation.reservation_id,
                        %kind,
                        error.message = %e,
                        "notification failed"
                    );
                    return Err(AppError::NotificationDispatchFailed {
                        reservation_id: reservation.reservation_id.to_string(),
                        kind: kind.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let entry = EmailLogEntry::new(
            reservation.reservation_id,
            recipient.to_string(),
            kind,
            Utc::now(),
        );
        if let Err(e) = bounded(
            "email log",
            self.config.store_timeout,
            self.email_log.record(entry),
        )
        .await
        {
            tracing::warn!(
                reservation_id = %reservation.reservation_id,
                error.message = %e,
                "could not record sent notification"
            );
        }
        Ok(())
    }
}
