use kernel::model::{
    id::ReservationId,
    reservation::{Area, Reservation, ReservationStatus, TimeSlot},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, NaiveDate, Utc};

// One row of the reservations table. Enumerations are stored as their text
// names and checked again on the way out.
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub requester_name: String,
    pub requester_email: String,
    pub area: String,
    pub reservation_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            requester_name,
            requester_email,
            area,
            reservation_date,
            start_time,
            end_time,
            status,
            created_at,
            confirmed_at,
            rejected_at,
        } = value;
        Ok(Reservation {
            reservation_id,
            requester_name,
            requester_email,
            area: area.parse::<Area>().map_err(|v| {
                AppError::ConversionEntityError(format!("unknown area `{v}` in {reservation_id}"))
            })?,
            date: reservation_date,
            start_time: parse_slot(&start_time, reservation_id)?,
            end_time: parse_slot(&end_time, reservation_id)?,
            status: status
                .parse::<ReservationStatus>()
                .map_err(AppError::ConversionEntityError)?,
            created_at,
            confirmed_at,
            rejected_at,
        })
    }
}

fn parse_slot(raw: &str, reservation_id: ReservationId) -> Result<TimeSlot, AppError> {
    raw.parse().map_err(|v| {
        AppError::ConversionEntityError(format!("invalid time slot `{v}` in {reservation_id}"))
    })
}
