use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::models::{IngestResponse, ObservationBatch, SeriesSummaryResponse, WeatherPattern};
use super::service::WeatherDataError;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Response for pattern replacement
#[derive(Debug, Serialize, ToSchema)]
pub struct PatternsResponse {
    pub location: String,
    pub count: usize,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Record one or more readings for a location
///
/// POST /observations/{location}
pub async fn record_observations(
    State(state): State<AppState>,
    Path(location): Path<String>,
    Json(batch): Json<ObservationBatch>,
) -> Result<(StatusCode, Json<IngestResponse>), WeatherDataError> {
    let response = state
        .weather_data_service
        .record_observations(&location, batch.into_vec())?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Replace the detected patterns for a location
///
/// PUT /patterns/{location}
pub async fn replace_patterns(
    State(state): State<AppState>,
    Path(location): Path<String>,
    Json(patterns): Json<Vec<WeatherPattern>>,
) -> Result<Json<PatternsResponse>, WeatherDataError> {
    let count = state
        .weather_data_service
        .replace_patterns(&location, patterns)?;

    Ok(Json(PatternsResponse {
        location: location.trim().to_string(),
        count,
    }))
}

/// Aggregates over the configured history window
///
/// GET /observations/{location}/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<SeriesSummaryResponse>, WeatherDataError> {
    let summary = state.weather_data_service.summary(&location)?;
    Ok(Json(summary))
}
