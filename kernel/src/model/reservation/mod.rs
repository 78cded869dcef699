use crate::model::id::ReservationId;
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub mod criteria;
pub mod event;
pub mod request;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub reservation_id: ReservationId,
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
}

impl Reservation {
    /// Timestamp of the approver's decision, whichever way it went.
    pub fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at.or(self.rejected_at)
    }

    /// Half-open interval overlap on the same area and date.
    pub fn overlaps(&self, area: Area, date: NaiveDate, start: TimeSlot, end: TimeSlot) -> bool {
        self.area == area && self.date == date && self.start_time < end && start < self.end_time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Only `pending -> confirmed` and `pending -> rejected` exist.
    pub fn can_transition_to(&self, target: ReservationStatus) -> bool {
        *self == Self::Pending && target.is_terminal()
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown reservation status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    #[serde(rename = "Aula 1")]
    Aula1,
    #[serde(rename = "Aula 2")]
    Aula2,
    #[serde(rename = "Aula 3")]
    Aula3,
    #[serde(rename = "Aula 4")]
    Aula4,
    #[serde(rename = "Auditorio")]
    Auditorio,
    #[serde(rename = "Consejo Superior")]
    ConsejoSuperior,
}

impl Area {
    pub const ALL: [Area; 6] = [
        Area::Aula1,
        Area::Aula2,
        Area::Aula3,
        Area::Aula4,
        Area::Auditorio,
        Area::ConsejoSuperior,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Aula1 => "Aula 1",
            Self::Aula2 => "Aula 2",
            Self::Aula3 => "Aula 3",
            Self::Aula4 => "Aula 4",
            Self::Auditorio => "Auditorio",
            Self::ConsejoSuperior => "Consejo Superior",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Area {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|area| area.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// One mark on the hourly slot grid used for start and end times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub const FIRST_HOUR: u32 = 8;
    pub const LAST_HOUR: u32 = 18;

    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (Self::FIRST_HOUR..=Self::LAST_HOUR)
            .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .map(TimeSlot)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Fixed width keeps "HH:MM" strings ordered the same way as the times.
        if s.len() != 5 {
            return Err(s.to_string());
        }
        let time = NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| s.to_string())?;
        let on_grid = time.minute() == 0
            && (Self::FIRST_HOUR..=Self::LAST_HOUR).contains(&time.hour());
        if on_grid {
            Ok(Self(time))
        } else {
            Err(s.to_string())
        }
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|v| serde::de::Error::custom(format!("`{v}` is not a time slot")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_machine_only_leaves_pending() {
        use ReservationStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Confirmed));
        assert_eq!("confirmed".parse::<ReservationStatus>(), Ok(Confirmed));
    }

    #[test]
    fn areas_round_trip_through_their_names() {
        for area in Area::ALL {
            assert_eq!(area.name().parse::<Area>(), Ok(area));
        }
        assert!("Aula 9".parse::<Area>().is_err());
        assert!("aula 1".parse::<Area>().is_err());
    }

    #[test]
    fn time_slots_cover_the_hourly_grid() {
        let slots: Vec<String> = TimeSlot::all().map(|s| s.to_string()).collect();
        assert_eq!(slots.first().map(String::as_str), Some("08:00"));
        assert_eq!(slots.last().map(String::as_str), Some("18:00"));
        assert_eq!(slots.len(), 11);

        assert!("10:30".parse::<TimeSlot>().is_err());
        assert!("07:00".parse::<TimeSlot>().is_err());
        assert!("9:00".parse::<TimeSlot>().is_err());
        assert!("19:00".parse::<TimeSlot>().is_err());
    }

    #[test]
    fn overlap_is_half_open() {
        let slot = |s: &str| s.parse::<TimeSlot>().unwrap();
        let date = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
        let reservation = Reservation {
            reservation_id: ReservationId::new(),
            requester_name: "Ana".into(),
            requester_email: "ana@example.com".into(),
            area: Area::Aula1,
            date,
            start_time: slot("10:00"),
            end_time: slot("12:00"),
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
            confirmed_at: None,
            rejected_at: None,
        };
        assert!(reservation.overlaps(Area::Aula1, date, slot("11:00"), slot("13:00")));
        assert!(!reservation.overlaps(Area::Aula1, date, slot("12:00"), slot("13:00")));
        assert!(!reservation.overlaps(Area::Aula2, date, slot("11:00"), slot("13:00")));
    }
}
