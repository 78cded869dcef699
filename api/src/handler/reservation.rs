use crate::{
    extractor::{AppJson, AppPath, AppQuery},
    model::reservation::{
        CreateReservationRequest, NotificationLogsResponse, ReservationResponse,
        ReservationsResponse, SearchReservationsQuery, UpdateReservationStatusRequest,
    },
};
use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use kernel::model::id::ReservationId;
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn submit_reservation(
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    registry
        .reservation_lifecycle()
        .submit(req.into())
        .await
        .map(|reservation| (StatusCode::CREATED, Json(reservation.into())))
}

pub async fn search_reservations(
    AppQuery(query): AppQuery<SearchReservationsQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    query.validate(&())?;

    registry
        .reservation_search()
        .search(&query.into())
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_reservation(
    AppPath(reservation_id): AppPath<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_lifecycle()
        .find(reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn update_reservation_status(
    AppPath(reservation_id): AppPath<ReservationId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<UpdateReservationStatusRequest>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_lifecycle()
        .transition(reservation_id, req.status)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn show_notification_log(
    AppPath(reservation_id): AppPath<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<NotificationLogsResponse>> {
    registry
        .reservation_lifecycle()
        .notification_log(reservation_id)
        .await
        .map(NotificationLogsResponse::from)
        .map(Json)
}
