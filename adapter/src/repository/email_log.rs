use crate::database::{model::email_log::EmailLogRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::id::ReservationId,
    repository::email_log::{EmailLogEntry, EmailLogRepository},
};
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct EmailLogRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EmailLogRepository for EmailLogRepositoryImpl {
    async fn record(&self, entry: EmailLogEntry) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO email_logs (reservation_id, email, kind, sent_at)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(entry.reservation_id)
        .bind(&entry.email)
        .bind(entry.kind.as_str())
        .bind(entry.sent_at)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::StoreUnavailable)?;
        Ok(())
    }

    async fn find_by_reservation_id(
        &self,
        reservation_id: ReservationId,
    ) -> AppResult<Vec<EmailLogEntry>> {
        sqlx::query_as::<_, EmailLogRow>(
            r#"
                SELECT reservation_id, email, kind, sent_at
                FROM email_logs
                WHERE reservation_id = $1
                ORDER BY sent_at ASC, email_log_id ASC
            "#,
        )
        .bind(reservation_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::StoreUnavailable)?
        .into_iter()
        .map(EmailLogEntry::try_from)
        .collect()
    }
}
