use crate::model::reservation::{Area, Reservation, TimeSlot};
use chrono::NaiveDate;
use shared::error::ValidationError;

/// Sparse search input. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub name: Option<String>,
    pub area: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
}

/// Equality predicates the store evaluates itself, combined with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    pub area: Option<Area>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<TimeSlot>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.area.map_or(true, |area| reservation.area == area)
            && self.date.map_or(true, |date| reservation.date == date)
            && self
                .start_time
                .map_or(true, |start| reservation.start_time == start)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl ReservationOrder {
    pub const NEWEST_FIRST: Self = Self {
        key: SortKey::CreatedAt,
        direction: SortDirection::Descending,
    };
}

/// Case-insensitive substring match on the requester name, applied to the
/// rows the store returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter(String);

impl NameFilter {
    pub fn new(needle: &str) -> Self {
        Self(needle.to_lowercase())
    }

    pub fn matches(&self, reservation: &Reservation) -> bool {
        reservation.requester_name.to_lowercase().contains(&self.0)
    }
}

/// A search split into its store query and its residual filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    pub filter: ReservationFilter,
    pub order: ReservationOrder,
    pub residual: Option<NameFilter>,
}

impl SearchCriteria {
    pub fn plan(&self) -> Result<SearchPlan, ValidationError> {
        let name = non_blank(&self.name);
        let area = non_blank(&self.area);
        let date = non_blank(&self.date);
        let start_time = non_blank(&self.start_time);

        if name.is_none() && area.is_none() && date.is_none() && start_time.is_none() {
            return Err(ValidationError::EmptyCriteria);
        }

        let filter = ReservationFilter {
            area: area
                .map(|v| v.parse::<Area>().map_err(|value| invalid("area", value)))
                .transpose()?,
            date: date
                .map(|v| {
                    NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| invalid("date", v.into()))
                })
                .transpose()?,
            start_time: start_time
                .map(|v| v.parse::<TimeSlot>().map_err(|value| invalid("startTime", value)))
                .transpose()?,
        };

        Ok(SearchPlan {
            filter,
            order: ReservationOrder::NEWEST_FIRST,
            residual: name.map(NameFilter::new),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(field: &'static str, value: String) -> ValidationError {
    ValidationError::InvalidCriterion { field, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_blank_criteria_are_rejected() {
        assert_eq!(
            SearchCriteria::default().plan(),
            Err(ValidationError::EmptyCriteria)
        );
        let blank = SearchCriteria {
            name: Some("  ".into()),
            area: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(blank.plan(), Err(ValidationError::EmptyCriteria));
    }

    #[test]
    fn name_stays_out_of_the_store_query() {
        let plan = SearchCriteria {
            name: Some("Ana".into()),
            area: Some("Aula 1".into()),
            ..Default::default()
        }
        .plan()
        .unwrap();
        assert_eq!(plan.filter.area, Some(Area::Aula1));
        assert_eq!(plan.filter.date, None);
        assert_eq!(plan.residual, Some(NameFilter::new("ana")));
        assert_eq!(plan.order, ReservationOrder::NEWEST_FIRST);
    }

    #[test]
    fn unparseable_filters_are_reported() {
        let res = SearchCriteria {
            start_time: Some("25:00".into()),
            ..Default::default()
        }
        .plan();
        assert_eq!(
            res,
            Err(ValidationError::InvalidCriterion {
                field: "startTime",
                value: "25:00".into()
            })
        );
    }
}
