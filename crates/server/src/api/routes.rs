use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{handlers, launches};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let launch_routes = Router::new()
        .route("/launches", get(launches::list_launches))
        .route("/launches/latest", get(launches::get_latest))
        .route("/launches/next", get(launches::get_next))
        .route("/launches/past", get(launches::list_past))
        .route("/launches/upcoming", get(launches::list_upcoming))
        .route("/launches/{flight_number}", get(launches::get_launch));

    Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .nest("/v3", launch_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
