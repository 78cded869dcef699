use super::{
    catalog::build_catalog_routers, health::build_health_check_routers,
    reservation::build_reservation_routers,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_reservation_routers())
        .merge(build_catalog_routers());
    Router::new().nest("/api/v1", router)
}
