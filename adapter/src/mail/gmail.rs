use crate::mail::template::{render, RenderedMail};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use kernel::notification::{NotificationKind, NotificationPayload, ReservationNotifier};
use reqwest::Client;
use shared::error::{AppError, AppResult};

const GMAIL_SEND_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

/// Sends plain-text mails through the Gmail REST API with a bearer token.
pub struct GmailNotifier {
    client: Client,
    access_token: String,
    sender: String,
}

impl GmailNotifier {
    pub fn new(access_token: String, sender: String) -> Self {
        Self {
            client: Client::new(),
            access_token,
            sender,
        }
    }
}

#[async_trait]
impl ReservationNotifier for GmailNotifier {
    #[tracing::instrument(skip(self, payload), fields(reservation_id = %payload.reservation_id))]
    async fn notify(
        &self,
        kind: NotificationKind,
        recipient: &str,
        payload: &NotificationPayload,
    ) -> AppResult<()> {
        let message = raw_message(&self.sender, recipient, &render(kind, payload));
        let encoded_message = general_purpose::URL_SAFE_NO_PAD.encode(message.as_bytes());

        let res = self
            .client
            .post(GMAIL_SEND_URL)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "raw": encoded_message }))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Gmail request failed: {e}")))?;

        let status = res.status();
        if status.is_success() {
            tracing::info!(%kind, "Gmail message sent");
            Ok(())
        } else {
            let detail = res.text().await.unwrap_or_default();
            Err(AppError::ExternalServiceError(format!(
                "Gmail responded {status}: {detail}"
            )))
        }
    }
}

/// RFC 822 message; the subject is RFC 2047 encoded because it is not ASCII.
fn raw_message(sender: &str, recipient: &str, mail: &RenderedMail) -> String {
    let subject = general_purpose::STANDARD.encode(mail.subject.as_bytes());
    format!(
        "From: {sender}\r\nTo: {recipient}\r\nSubject: =?UTF-8?B?{subject}?=\r\n\
         MIME-Version: 1.0\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\n{}",
        mail.body
    )
}
