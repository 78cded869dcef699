use crate::model::{
    id::ReservationId,
    reservation::{Area, Reservation, ReservationStatus, TimeSlot},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use shared::error::AppResult;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Submitted,
    Confirmed,
    Rejected,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }

    /// The notification announcing that a reservation entered `status`.
    pub fn for_status(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Pending => Self::Submitted,
            ReservationStatus::Confirmed => Self::Confirmed,
            ReservationStatus::Rejected => Self::Rejected,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a transport needs to render a message about one reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub reservation_id: ReservationId,
    pub reference_code: String,
    pub name: String,
    pub area: Area,
    pub date: NaiveDate,
    pub start_time: TimeSlot,
    pub end_time: TimeSlot,
}

impl From<&Reservation> for NotificationPayload {
    fn from(value: &Reservation) -> Self {
        Self {
            reservation_id: value.reservation_id,
            reference_code: value.reservation_id.reference_code(),
            name: value.requester_name.clone(),
            area: value.area,
            date: value.date,
            start_time: value.start_time,
            end_time: value.end_time,
        }
    }
}

#[async_trait]
pub trait ReservationNotifier: Send + Sync {
    async fn notify(
        &self,
        kind: NotificationKind,
        recipient: &str,
        payload: &NotificationPayload,
    ) -> AppResult<()>;
}
