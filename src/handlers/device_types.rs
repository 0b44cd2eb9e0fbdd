use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::definitions;
use crate::importer::ImportSummary;
use crate::models::*;
use crate::AppState;

use super::ApiError;

/// List all manufacturers
pub async fn list_manufacturers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Manufacturer>>, ApiError> {
    let manufacturers = state.store.list_manufacturers().await?;
    Ok(Json(manufacturers))
}

/// List all device types
pub async fn list_device_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DeviceType>>, ApiError> {
    let device_types = state.store.list_device_types().await?;
    Ok(Json(device_types))
}

/// Get the built-in device type definitions
pub async fn get_default_definitions() -> Json<Vec<DeviceTypeDefinition>> {
    Json(definitions::builtin().definitions)
}

/// Get a device type with its interface templates
pub async fn get_device_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeviceTypeDetail>, ApiError> {
    let detail = state.store.get_device_type_detail(id).await?;
    Ok(Json(detail))
}

/// List the interface templates of a device type
pub async fn list_interface_templates(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<InterfaceTemplate>>, ApiError> {
    if state.store.get_device_type(id).await?.is_none() {
        return Err(ApiError::not_found("device type"));
    }
    let interfaces = state.store.list_interface_templates(id).await?;
    Ok(Json(interfaces))
}

/// Run an import. Runs are serialized; a dry run reports without committing.
pub async fn import_device_types(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportSummary>, ApiError> {
    let _running = state.import_lock.lock().await;

    let summary = match (req.definitions, req.yaml) {
        (Some(_), Some(_)) => {
            return Err(ApiError::bad_request("provide either definitions or yaml, not both"));
        }
        (Some(defs), None) => state.importer.import_definitions(&defs, req.dry_run).await?,
        (None, Some(yaml)) => {
            let set = definitions::parse_document(&yaml);
            state.importer.import_set(&set, req.dry_run).await?
        }
        (None, None) => {
            let set = definitions::load_or_builtin(&state.config.definitions_path).await?;
            state.importer.import_set(&set, req.dry_run).await?
        }
    };

    Ok(Json(summary))
}
