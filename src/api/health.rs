use crate::api::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    service_types: usize,
    drivers: Vec<String>,
    uptime_seconds: u64,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let service_types = state.registries.services.len();

    Json(HealthResponse {
        status: if service_types > 0 {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        service_types,
        drivers: state.registries.drivers.drivers(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
