use axum::Json;
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::recommendations::handlers::ToggleResponse;
use crate::recommendations::models::{
    Category, DeriveRequest, Priority, Recommendation, RecommendationsResponse,
};
use crate::recommendations::progress::ActionProgress;
use crate::weather::handlers::{HealthResponse, PatternsResponse};
use crate::weather::models::{
    IngestResponse, ObservationBatch, SeriesSummaryResponse, WeatherPattern, WeatherSnapshot,
};

/// OpenAPI schema documentation for the Farmcast API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Farmcast API",
        version = "1.0.0",
        description = "Weather-driven agricultural recommendations. Ingests farm weather observations and detected patterns, and turns them into prioritized action lists.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "recommendations", description = "Derived farming recommendations"),
        (name = "observations", description = "Weather observation ingest and summaries"),
        (name = "patterns", description = "Detected weather patterns"),
        (name = "progress", description = "Action checklist state")
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            WeatherSnapshot,
            ObservationBatch,
            WeatherPattern,
            IngestResponse,
            PatternsResponse,
            SeriesSummaryResponse,
            Priority,
            Category,
            Recommendation,
            DeriveRequest,
            RecommendationsResponse,
            ActionProgress,
            ToggleResponse,
        )
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
