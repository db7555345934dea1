mod health;
mod service_types;

pub use health::health_check;
pub use service_types::{get_service_type, list_service_types, service_doc, validate_config};

use crate::bootstrap::Registries;
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Instant;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub registries: Registries,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(registries: Registries) -> Self {
        Self {
            registries,
            start_time: Instant::now(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/service-types", get(list_service_types))
        .route("/service-types/:name", get(get_service_type))
        .route("/service-types/:name/validate", post(validate_config))
        .route("/service-types/:name/doc", post(service_doc))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
