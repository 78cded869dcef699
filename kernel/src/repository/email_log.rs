use crate::{model::id::ReservationId, notification::NotificationKind};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use shared::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct EmailLogEntry {
    pub reservation_id: ReservationId,
    pub email: String,
    pub kind: NotificationKind,
    pub sent_at: DateTime<Utc>,
}

/// Audit trail of notifications that were actually delivered to a transport.
#[async_trait]
pub trait EmailLogRepository: Send + Sync {
    async fn record(&self, entry: EmailLogEntry) -> AppResult<()>;
    async fn find_by_reservation_id(
        &self,
        reservation_id: ReservationId,
    ) -> AppResult<Vec<EmailLogEntry>>;
}
