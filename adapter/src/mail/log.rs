use crate::mail::template::render;
use async_trait::async_trait;
use kernel::notification::{NotificationKind, NotificationPayload, ReservationNotifier};
use shared::error::AppResult;

/// Writes the rendered message to the log instead of delivering it.
pub struct TracingNotifier;

#[async_trait]
impl ReservationNotifier for TracingNotifier {
    async fn notify(
        &self,
        kind: NotificationKind,
        recipient: &str,
        payload: &NotificationPayload,
    ) -> AppResult<()> {
        let mail = render(kind, payload);
        tracing::info!(
            %kind,
            recipient,
            reservation_id = %payload.reservation_id,
            subject = %mail.subject,
            "notification (log transport)"
        );
        tracing::debug!(body = %mail.body);
        Ok(())
    }
}
