use kernel::{
    model::id::ReservationId, notification::NotificationKind,
    repository::email_log::EmailLogEntry,
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct EmailLogRow {
    pub reservation_id: ReservationId,
    pub email: String,
    pub kind: String,
    pub sent_at: DateTime<Utc>,
}

impl TryFrom<EmailLogRow> for EmailLogEntry {
    type Error = AppError;

    fn try_from(value: EmailLogRow) -> Result<Self, Self::Error> {
        let kind = match value.kind.as_str() {
            "submitted" => NotificationKind::Submitted,
            "confirmed" => NotificationKind::Confirmed,
            "rejected" => NotificationKind::Rejected,
            other => {
                return Err(AppError::ConversionEntityError(format!(
                    "unknown notification kind `{other}`"
                )))
            }
        };
        Ok(EmailLogEntry::new(
            value.reservation_id,
            value.email,
            kind,
            value.sent_at,
        ))
    }
}
