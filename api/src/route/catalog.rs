use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::catalog::{show_area_list, show_time_slot_list};

pub fn build_catalog_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/areas", get(show_area_list))
        .route("/time-slots", get(show_time_slot_list))
}
