mod clock;
mod config;
mod error;
mod extractors;
mod middleware;
mod openapi;
mod recommendations;
mod routes;
mod weather;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::recommendations::{ActionProgressStore, RecommendationEngine, RecommendationService};
use crate::weather::{FarmDataStore, WeatherDataService};

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub recommendation_service: Arc<RecommendationService>,
    pub weather_data_service: Arc<WeatherDataService>,
    pub progress: Arc<ActionProgressStore>,
    pub metrics: PrometheusHandle,
    pub config: Arc<AppConfig>,
}

/// Wire stores, services and the engine together
pub fn build_state(
    config: AppConfig,
    clock: Arc<dyn Clock>,
    metrics: PrometheusHandle,
) -> anyhow::Result<AppState> {
    config.validate()?;

    // One store backs both the ingest endpoints and the engine's providers
    let store = Arc::new(FarmDataStore::new(config.max_observations_per_location));

    let engine = RecommendationEngine::new(config.engine_settings()?, Arc::clone(&clock));
    let recommendation_service = Arc::new(RecommendationService::new(
        engine,
        store.clone(),
        store.clone(),
        config.history_window_days,
    ));
    let weather_data_service = Arc::new(WeatherDataService::new(
        store,
        clock,
        config.history_window_days,
    ));

    Ok(AppState {
        recommendation_service,
        weather_data_service,
        progress: Arc::new(ActionProgressStore::new(
            config.max_tracked_recommendations,
            config.max_actions_per_recommendation,
        )),
        metrics,
        config: Arc::new(config),
    })
}

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", err),
        )
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farmcast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!(
        region = %config.farm.region,
        timezone = %config.farm.timezone,
        history_window_days = config.history_window_days,
        "Configuration loaded successfully"
    );

    // Install the global metrics recorder; /metrics renders from its handle
    let metrics = PrometheusBuilder::new().install_recorder()?;

    if config.ingest_api_key.is_none() {
        tracing::warn!("No ingest API key configured, ingest endpoints are open");
    }

    // Create shared application state
    let state = build_state(config.clone(), Arc::new(SystemClock), metrics)?;

    // Build router with middleware stack
    let app = routes::build_router(state.clone())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
