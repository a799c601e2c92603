//! Public catalog and label endpoints

use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Fruit;

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub fruits: Vec<Fruit>,
}

#[derive(Debug, Serialize)]
pub struct LabelsResponse {
    pub labels: Vec<String>,
    pub contract_version: String,
    pub input_shape: String,
}

/// GET /catalog
pub async fn list_catalog(State(state): State<AppState>) -> Result<Json<CatalogResponse>, ApiError> {
    let fruits = state.catalog.list_all().await?;
    Ok(Json(CatalogResponse { fruits }))
}

/// GET /labels
pub async fn list_labels(State(state): State<AppState>) -> Json<LabelsResponse> {
    let service = &state.prediction_service;

    Json(LabelsResponse {
        labels: service.labels().as_slice().to_vec(),
        contract_version: service.contract_version().to_string(),
        input_shape: service.input_shape().to_string(),
    })
}
