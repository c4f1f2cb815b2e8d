//! Dataset routes
//!
//! The full snapshot, its status, manual reload and the dimension / phase /
//! keyword slices.

use crate::dataset::{dimension_counts, DatasetSnapshot, SnapshotMetadata};
use crate::dataset::query::DimensionCount;
use crate::error::ApiResult;
use crate::models::{Dataset, Dimension, Phase, SuccessResponse};
use crate::state::SharedState;
use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

// ==================== Response Types ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetResponse {
    pub snapshot: SnapshotMetadata,
    #[serde(flatten)]
    pub dataset: Dataset,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStatus {
    /// A workbook snapshot with at least one policy is cached
    pub loaded: bool,
    pub snapshot: SnapshotMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionsResponse {
    pub dimensions: Vec<Dimension>,
    pub counts: Vec<DimensionCount>,
}

async fn status_of(state: &SharedState, snapshot: &DatasetSnapshot) -> DatasetStatus {
    DatasetStatus {
        loaded: state.dataset.is_loaded().await,
        snapshot: snapshot.metadata(),
    }
}

// ==================== Handlers ====================

/// Full `{policies, keywords, dimensions, phases}` dataset
pub async fn get_dataset(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<DatasetResponse>>> {
    let snapshot = state.dataset.current().await;
    Ok(Json(SuccessResponse::with_data(
        format!("Dataset retrieved ({} policies)", snapshot.dataset.policies.len()),
        DatasetResponse {
            snapshot: snapshot.metadata(),
            dataset: snapshot.dataset.as_ref().clone(),
        },
    )))
}

pub async fn dataset_status(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<DatasetStatus>>> {
    let snapshot = state.dataset.current().await;
    Ok(Json(SuccessResponse::with_data(
        "Dataset status retrieved",
        status_of(&state, &snapshot).await,
    )))
}

/// Re-run ingestion now
pub async fn reload_dataset(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<DatasetStatus>>> {
    let snapshot = state.dataset.reload().await;
    info!(
        "Manual reload finished: snapshot {} ({:?}, {} policies)",
        snapshot.id,
        snapshot.origin,
        snapshot.dataset.policies.len()
    );
    Ok(Json(SuccessResponse::with_data(
        "Dataset reloaded",
        status_of(&state, &snapshot).await,
    )))
}

pub async fn list_dimensions(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<DimensionsResponse>>> {
    let snapshot = state.dataset.current().await;
    Ok(Json(SuccessResponse::with_data(
        "Dimensions retrieved",
        DimensionsResponse {
            dimensions: snapshot.dataset.dimensions.clone(),
            counts: dimension_counts(&snapshot.dataset),
        },
    )))
}

pub async fn list_phases(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<Vec<Phase>>>> {
    let snapshot = state.dataset.current().await;
    Ok(Json(SuccessResponse::with_data(
        format!("{} phases", snapshot.dataset.phases.len()),
        snapshot.dataset.phases.clone(),
    )))
}

pub async fn list_keywords(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<Vec<String>>>> {
    let snapshot = state.dataset.current().await;
    Ok(Json(SuccessResponse::with_data(
        format!("{} keywords", snapshot.dataset.keywords.len()),
        snapshot.dataset.keywords.clone(),
    )))
}
