use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::models::{DeriveRequest, RecommendationsResponse};
use super::progress::{require_id, ActionProgress, ProgressError};
use super::service::RecommendationError;
use crate::extractors::LocationParam;
use crate::AppState;

/// Result of toggling one action
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub recommendation_id: String,
    pub action_index: usize,
    pub completed: bool,
    pub completed_actions: Vec<usize>,
}

/// Recommendations for a stored location (or the configured default)
///
/// GET /recommendations/{location} or /recommendations?location=
pub async fn get_recommendations(
    State(state): State<AppState>,
    location: LocationParam,
) -> Result<Json<RecommendationsResponse>, RecommendationError> {
    let location = location.or_default(state.config.farm.default_location.clone());
    let response = state.recommendation_service.for_location(&location)?;
    Ok(Json(response))
}

/// Recommendations for caller-supplied weather and patterns
///
/// POST /recommendations/derive
pub async fn derive_recommendations(
    State(state): State<AppState>,
    Json(request): Json<DeriveRequest>,
) -> Result<Json<RecommendationsResponse>, RecommendationError> {
    let response = state.recommendation_service.derive(request)?;
    Ok(Json(response))
}

/// GET /progress/{id}
pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionProgress>, ProgressError> {
    let id = require_id(&id)?;
    Ok(Json(state.progress.progress(id)))
}

/// Toggle an action between done and not done
///
/// POST /progress/{id}/actions/{index}
pub async fn toggle_action(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<ToggleResponse>, ProgressError> {
    let id = require_id(&id)?;
    let completed = state.progress.toggle(id, index)?;

    tracing::debug!(
        recommendation_id = %id,
        index,
        completed,
        tracked = state.progress.len(),
        "Action toggled"
    );

    Ok(Json(ToggleResponse {
        recommendation_id: id.to_string(),
        action_index: index,
        completed,
        completed_actions: state.progress.progress(id).completed_actions,
    }))
}

/// DELETE /progress/{id}
pub async fn clear_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ProgressError> {
    let id = require_id(&id)?;
    state.progress.clear(id);
    Ok(StatusCode::NO_CONTENT)
}
