use axum::{
    extract::State,
    middleware,
    routing::{get, post, put},
    Extension, Router,
};

use crate::middleware::{require_api_key, IngestApiKey};
use crate::openapi::openapi_json;
use crate::recommendations::handlers as recommendation_handlers;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the recommendation API routes
fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recommendations",
            get(recommendation_handlers::get_recommendations),
        )
        .route(
            "/recommendations/derive",
            post(recommendation_handlers::derive_recommendations),
        )
        .route(
            "/recommendations/{location}",
            get(recommendation_handlers::get_recommendations),
        )
}

/// Build the action progress routes
fn progress_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/progress/{id}",
            get(recommendation_handlers::get_progress)
                .delete(recommendation_handlers::clear_progress),
        )
        .route(
            "/progress/{id}/actions/{index}",
            post(recommendation_handlers::toggle_action),
        )
}

/// Build the observation read routes
fn observation_routes() -> Router<AppState> {
    Router::new().route(
        "/observations/{location}/summary",
        get(weather_handlers::get_summary),
    )
}

/// Build the ingest routes (protected by API key auth)
fn ingest_routes(api_key: Option<String>) -> Router<AppState> {
    Router::new()
        .route(
            "/observations/{location}",
            post(weather_handlers::record_observations),
        )
        .route(
            "/patterns/{location}",
            put(weather_handlers::replace_patterns),
        )
        .layer(middleware::from_fn(require_api_key))
        .layer(Extension(IngestApiKey(api_key)))
}

/// Build all API v1 routes
pub fn api_v1_routes(ingest_api_key: Option<String>) -> Router<AppState> {
    Router::new()
        .merge(recommendation_routes())
        .merge(progress_routes())
        .merge(observation_routes())
        .merge(ingest_routes(ingest_api_key))
}

/// Prometheus text exposition
async fn render_metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}

/// Build the complete application router
pub fn build_router(state: AppState) -> Router<AppState> {
    let ingest_api_key = state.config.ingest_api_key.clone();
    Router::new()
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .route("/metrics", get(render_metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1", api_v1_routes(ingest_api_key))
}
