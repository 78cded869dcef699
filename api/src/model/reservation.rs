use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use kernel::{
    model::{
        id::ReservationId,
        reservation::{
            criteria::SearchCriteria, request::SubmitReservation, Area, Reservation,
            ReservationStatus, TimeSlot,
        },
    },
    notification::NotificationKind,
    repository::email_log::EmailLogEntry,
};
use serde::{Deserialize, Serialize};

// Every field is optional here so that an absent field surfaces as
// MissingField from the lifecycle checks rather than as a JSON error.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateReservationRequest {
    #[serde(default)]
    #[garde(length(max = 120))]
    pub requester_name: Option<String>,
    #[serde(default)]
    #[garde(length(max = 254))]
    pub requester_email: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub area: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub date: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub start_time: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub end_time: Option<String>,
}

impl From<CreateReservationRequest> for SubmitReservation {
    fn from(value: CreateReservationRequest) -> Self {
        let CreateReservationRequest {
            requester_name,
            requester_email,
            area,
            date,
            start_time,
            end_time,
        } = value;
        SubmitReservation {
            requester_name,
            requester_email,
            area,
            date,
            start_time,
            end_time,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateReservationStatusRequest {
    pub status: ReservationStatus,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchReservationsQuery {
    #[garde(length(max = 120))]
    pub name: Option<String>,
    #[garde(skip)]
    pub area: Option<String>,
    #[garde(skip)]
    pub date: Option<String>,
    #[garde(skip)]
    pub start_time: Option<String>,
}

impl From<SearchReservationsQuery> for SearchCriteria {
    fn from(value: SearchReservationsQuery) -> Self {
        let SearchReservationsQuery {
            name,
            area,
            date,
            start_time,
        } = value;
        SearchCriteria {
            name,
            area,
            date,
            start_time,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: ReservationId,
    pub reference_code: String,
    pub requester_name: String,
    pub requester_email: String,
    pub area: Area,
    pub date: NaiveDate,
    pub start_time: TimeSlot,
    pub end_time: TimeSlot,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let decided_at = value.decided_at();
        let Reservation {
            reservation_id,
            requester_name,
            requester_email,
            area,
            date,
            start_time,
            end_time,
            status,
            created_at,
            confirmed_at,
            rejected_at,
        } = value;
        Self {
            id: reservation_id,
            reference_code: reservation_id.reference_code(),
            requester_name,
            requester_email,
            area,
            date,
            start_time,
            end_time,
            status,
            created_at,
            confirmed_at,
            rejected_at,
            decided_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationLogResponse {
    pub kind: NotificationKind,
    pub email: String,
    pub sent_at: DateTime<Utc>,
}

impl From<EmailLogEntry> for NotificationLogResponse {
    fn from(value: EmailLogEntry) -> Self {
        Self {
            kind: value.kind,
            email: value.email,
            sent_at: value.sent_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationLogsResponse {
    pub items: Vec<NotificationLogResponse>,
}

impl From<Vec<EmailLogEntry>> for NotificationLogsResponse {
    fn from(value: Vec<EmailLogEntry>) -> Self {
        Self {
            items: value.into_iter().map(NotificationLogResponse::from).collect(),
        }
    }
}
