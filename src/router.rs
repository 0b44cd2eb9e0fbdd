use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::healthcheck))
        // Manufacturer routes
        .route("/api/manufacturers", get(handlers::device_types::list_manufacturers))
        // Device type routes
        .route("/api/device-types", get(handlers::device_types::list_device_types))
        .route("/api/device-types/defaults", get(handlers::device_types::get_default_definitions))
        .route("/api/device-types/import", post(handlers::device_types::import_device_types))
        .route("/api/device-types/:id", get(handlers::device_types::get_device_type))
        .route("/api/device-types/:id/interfaces", get(handlers::device_types::list_interface_templates))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
