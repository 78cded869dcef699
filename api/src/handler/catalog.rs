use crate::model::catalog::{AreasResponse, TimeSlotsResponse};
use axum::Json;

pub async fn show_area_list() -> Json<AreasResponse> {
    Json(AreasResponse::all())
}

pub async fn show_time_slot_list() -> Json<TimeSlotsResponse> {
    Json(TimeSlotsResponse::all())
}
