use crate::model::reservation::{event::CreateReservation, Area, TimeSlot};
use chrono::{DateTime, NaiveDate, Utc};
use shared::error::ValidationError;

/// Raw reservation request as it arrives from a caller. Every field may be
/// missing; [`SubmitReservation::validate`] decides whether it is acceptable.
#[derive(Debug, Clone, Default)]
pub struct SubmitReservation {
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
    pub area: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl SubmitReservation {
    /// Checks the request in a fixed order and stops at the first failure:
    /// presence, time range, email, area, slot grid, date.
    pub fn validate(
        &self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<CreateReservation, ValidationError> {
        let requester_name = present(&self.requester_name, "requesterName")?;
        let requester_email = present(&self.requester_email, "requesterEmail")?;
        let area = present(&self.area, "area")?;
        let date = present(&self.date, "date")?;
        let start_time = present(&self.start_time, "startTime")?;
        let end_time = present(&self.end_time, "endTime")?;

        if start_time >= end_time {
            return Err(ValidationError::InvalidTimeRange {
                start: start_time.into(),
                end: end_time.into(),
            });
        }

        if !is_valid_email(requester_email) {
            return Err(ValidationError::InvalidEmail(requester_email.into()));
        }

        let area: Area = area.parse().map_err(ValidationError::UnknownArea)?;
        let start_time: TimeSlot = start_time
            .parse()
            .map_err(ValidationError::InvalidTimeSlot)?;
        let end_time: TimeSlot = end_time.parse().map_err(ValidationError::InvalidTimeSlot)?;

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(date.into()))?;
        if date < today {
            return Err(ValidationError::PastDate(date.to_string()));
        }

        Ok(CreateReservation::new(
            requester_name.into(),
            requester_email.into(),
            area,
            date,
            start_time,
            end_time,
            now,
        ))
    }
}

fn present<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

/// `local@domain` with both parts non-empty and a dotted domain whose labels
/// are all non-empty.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn request() -> SubmitReservation {
        SubmitReservation {
            requester_name: Some("Juan Pérez".into()),
            requester_email: Some("juan@example.com".into()),
            area: Some("Auditorio".into()),
            date: Some("2030-01-15".into()),
            start_time: Some("10:00".into()),
            end_time: Some("11:00".into()),
        }
    }

    fn check(req: SubmitReservation) -> Result<CreateReservation, ValidationError> {
        req.validate(today(), Utc::now())
    }

    #[test]
    fn accepts_a_complete_request() {
        let created = check(request()).unwrap();
        assert_eq!(created.requester_name, "Juan Pérez");
        assert_eq!(created.area, Area::Auditorio);
        assert_eq!(created.start_time.to_string(), "10:00");
        assert_eq!(created.end_time.to_string(), "11:00");
    }

    #[test]
    fn reports_the_first_missing_field() {
        let req = SubmitReservation {
            requester_name: Some("   ".into()),
            area: None,
            ..request()
        };
        assert_eq!(check(req), Err(ValidationError::MissingField("requesterName")));

        let req = SubmitReservation {
            end_time: None,
            ..request()
        };
        assert_eq!(check(req), Err(ValidationError::MissingField("endTime")));
    }

    #[test]
    fn rejects_empty_or_inverted_time_ranges() {
        for (start, end) in [("11:00", "11:00"), ("12:00", "09:00")] {
            let req = SubmitReservation {
                start_time: Some(start.into()),
                end_time: Some(end.into()),
                ..request()
            };
            assert!(matches!(
                check(req),
                Err(ValidationError::InvalidTimeRange { .. })
            ));
        }
    }

    #[test]
    fn time_range_is_checked_before_email() {
        let req = SubmitReservation {
            requester_email: Some("not-an-email".into()),
            start_time: Some("12:00".into()),
            end_time: Some("10:00".into()),
            ..request()
        };
        assert!(matches!(
            check(req),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in [
            "juan",
            "@example.com",
            "juan@",
            "juan@example",
            "juan@@example.com",
            "juan@example..com",
            "juan perez@example.com",
            "juan@.com",
        ] {
            let req = SubmitReservation {
                requester_email: Some(email.into()),
                ..request()
            };
            assert_eq!(
                check(req),
                Err(ValidationError::InvalidEmail(email.into())),
                "{email}"
            );
        }
    }

    #[test]
    fn rejects_unknown_areas_and_off_grid_slots() {
        let req = SubmitReservation {
            area: Some("Gimnasio".into()),
            ..request()
        };
        assert_eq!(check(req), Err(ValidationError::UnknownArea("Gimnasio".into())));

        let req = SubmitReservation {
            start_time: Some("10:30".into()),
            end_time: Some("11:00".into()),
            ..request()
        };
        assert_eq!(check(req), Err(ValidationError::InvalidTimeSlot("10:30".into())));
    }

    #[test]
    fn rejects_bad_and_past_dates() {
        let req = SubmitReservation {
            date: Some("15/01/2030".into()),
            ..request()
        };
        assert_eq!(check(req), Err(ValidationError::InvalidDate("15/01/2030".into())));

        let req = SubmitReservation {
            date: Some("2026-10-16".into()),
            ..request()
        };
        assert_eq!(check(req), Err(ValidationError::PastDate("2026-10-16".into())));

        let req = SubmitReservation {
            date: Some("2026-10-17".into()),
            ..request()
        };
        assert!(check(req).is_ok());
    }
}
