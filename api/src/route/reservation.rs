use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    search_reservations, show_notification_log, show_reservation, submit_reservation,
    update_reservation_status,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservations_routers = Router::new()
        .route("/", post(submit_reservation))
        .route("/", get(search_reservations))
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id/status", put(update_reservation_status))
        .route("/:reservation_id/notifications", get(show_notification_log));

    Router::new().nest("/reservations", reservations_routers)
}
