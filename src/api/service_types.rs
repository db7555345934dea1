use crate::api::AppState;
use crate::docs::ServiceDoc;
use crate::error::Result;
use crate::registry::{ServiceTypeGroup, ServiceTypeInfo};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    group: Option<ServiceTypeGroup>,
}

#[derive(Serialize)]
pub struct ListResponse {
    service_types: Vec<ServiceTypeInfo>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    service_type: String,
    valid: bool,
}

pub async fn list_service_types(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<ListResponse> {
    Json(ListResponse {
        service_types: state.registries.services.list(query.group),
    })
}

pub async fn get_service_type(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ServiceTypeInfo>> {
    Ok(Json(state.registries.services.info(&name)?))
}

pub async fn validate_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(config): Json<Value>,
) -> Result<Json<ValidateResponse>> {
    state.registries.services.validate_config(&name, &config)?;

    Ok(Json(ValidateResponse {
        service_type: name,
        valid: true,
    }))
}

/// Build a throwaway instance from the posted config and document it
pub async fn service_doc(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(config): Json<Value>,
) -> Result<Json<ServiceDoc>> {
    let services = &state.registries.services;
    let service = services.construct(&name, &config)?;
    let doc = services.documentation_for(service.as_ref())?;

    debug!("Generated documentation for {} service '{}'", name, doc.service);
    Ok(Json(doc))
}
