//! Policy routes
//!
//! Filtered listing, lookup by id and related-policy ranking.

use crate::dataset::query::RelatedPolicy;
use crate::dataset::{filter_policies, related_policies, PolicyFilter};
use crate::error::{not_found_error, validation_error, ApiResult};
use crate::models::{DimensionId, Policy, PolicyId, SuccessResponse};
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;
use validator::Validate;

// ==================== Request Types ====================

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PolicyListQuery {
    #[validate(length(min = 1, max = 32, message = "Dimension must be between 1 and 32 characters"))]
    pub dimension: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Phase id must be between 1 and 200 characters"))]
    pub phase: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Keyword must be between 1 and 100 characters"))]
    pub keyword: Option<String>,

    #[validate(length(max = 200, message = "Search text must be at most 200 characters"))]
    pub q: Option<String>,
}

impl PolicyListQuery {
    fn into_filter(self) -> ApiResult<PolicyFilter> {
        let dimension = self
            .dimension
            .as_deref()
            .map(str::parse::<DimensionId>)
            .transpose()
            .map_err(validation_error)?;

        Ok(PolicyFilter {
            dimension,
            phase: self.phase,
            keyword: self.keyword,
            text: self.q,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RelatedQuery {
    #[validate(range(min = 1, max = 5, message = "minStrength must be between 1 and 5"))]
    pub min_strength: Option<usize>,
}

// ==================== Handlers ====================

pub async fn list_policies(
    State(state): State<SharedState>,
    Query(params): Query<PolicyListQuery>,
) -> ApiResult<Json<SuccessResponse<Vec<Policy>>>> {
    params
        .validate()
        .map_err(|e| validation_error(e.to_string()))?;
    let filter = params.into_filter()?;

    let snapshot = state.dataset.current().await;
    let policies: Vec<Policy> = filter_policies(&snapshot.dataset, &filter)
        .into_iter()
        .cloned()
        .collect();

    debug!("Policy filter {:?} matched {} policies", filter, policies.len());

    Ok(Json(SuccessResponse::with_data(
        format!("{} policies", policies.len()),
        policies,
    )))
}

pub async fn get_policy(
    State(state): State<SharedState>,
    Path(id): Path<PolicyId>,
) -> ApiResult<Json<SuccessResponse<Policy>>> {
    let snapshot = state.dataset.current().await;
    let policy = snapshot
        .dataset
        .policy(id)
        .cloned()
        .ok_or_else(|| not_found_error(format!("Policy {} not found", id)))?;

    Ok(Json(SuccessResponse::with_data("Policy retrieved", policy)))
}

/// Policies sharing keywords with `id`, strongest first
pub async fn related(
    State(state): State<SharedState>,
    Path(id): Path<PolicyId>,
    Query(params): Query<RelatedQuery>,
) -> ApiResult<Json<SuccessResponse<Vec<RelatedPolicy>>>> {
    params
        .validate()
        .map_err(|e| validation_error(e.to_string()))?;

    let snapshot = state.dataset.current().await;
    let related = related_policies(&snapshot.dataset, id, params.min_strength.unwrap_or(1))
        .ok_or_else(|| not_found_error(format!("Policy {} not found", id)))?;

    Ok(Json(SuccessResponse::with_data(
        format!("{} related policies", related.len()),
        related,
    )))
}
