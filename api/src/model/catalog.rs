use kernel::model::reservation::{Area, TimeSlot};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreasResponse {
    pub items: Vec<Area>,
}

impl AreasResponse {
    pub fn all() -> Self {
        Self {
            items: Area::ALL.to_vec(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotsResponse {
    pub items: Vec<TimeSlot>,
}

impl TimeSlotsResponse {
    pub fn all() -> Self {
        Self {
            items: TimeSlot::all().collect(),
        }
    }
}
