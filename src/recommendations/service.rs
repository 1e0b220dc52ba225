use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Duration;
use thiserror::Error;

use super::engine::RecommendationEngine;
use super::models::{DeriveRequest, RecommendationsResponse};
use crate::clock::{window_days, window_start};
use crate::error::HttpError;
use crate::impl_into_response;
use crate::weather::models::{WeatherPattern, WeatherSeries, WeatherSnapshot};
use crate::weather::provider::{PatternAnalyzer, WeatherProvider};

#[derive(Error, Debug)]
pub enum RecommendationError {
    #[error("Location must not be empty")]
    EmptyLocation,

    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

impl HttpError for RecommendationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::EmptyLocation => Some("EMPTY_LOCATION"),
            Self::InvalidObservation(_) => Some("INVALID_OBSERVATION"),
            Self::InvalidPattern(_) => Some("INVALID_PATTERN"),
        }
    }
}

impl_into_response!(RecommendationError);

/// Feeds the engine from the weather providers or from request bodies
pub struct RecommendationService {
    engine: RecommendationEngine,
    weather: Arc<dyn WeatherProvider>,
    patterns: Arc<dyn PatternAnalyzer>,
    history_window: Duration,
}

impl RecommendationService {
    pub fn new(
        engine: RecommendationEngine,
        weather: Arc<dyn WeatherProvider>,
        patterns: Arc<dyn PatternAnalyzer>,
        history_window_days: i64,
    ) -> Self {
        Self {
            engine,
            weather,
            patterns,
            history_window: window_days(history_window_days),
        }
    }

    /// Recommendations from everything stored for a location
    pub fn for_location(
        &self,
        location: &str,
    ) -> Result<RecommendationsResponse, RecommendationError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(RecommendationError::EmptyLocation);
        }

        let now = self.engine.now();
        let current = self.weather.current_weather(location);
        let history = self
            .weather
            .historical_series(location, window_start(now, self.history_window));
        let patterns = self.patterns.detected_patterns(location);

        tracing::debug!(
            location = %location,
            samples = history.len(),
            patterns = patterns.len(),
            "Deriving recommendations from stored data"
        );

        Ok(self.respond("stored", location, now, current, &history, &patterns))
    }

    /// Recommendations from caller-supplied inputs
    pub fn derive(
        &self,
        request: DeriveRequest,
    ) -> Result<RecommendationsResponse, RecommendationError> {
        if let Some(current) = &request.current {
            current
                .validate()
                .map_err(|e| RecommendationError::InvalidObservation(format!("current: {}", e)))?;
        }
        for (i, snapshot) in request.history.iter().enumerate() {
            snapshot
                .validate()
                .map_err(|e| RecommendationError::InvalidObservation(format!("history #{}: {}", i, e)))?;
        }
        for pattern in &request.patterns {
            pattern
                .validate()
                .map_err(RecommendationError::InvalidPattern)?;
        }

        let location = request
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(self.engine.settings().farm_location.as_str())
            .to_string();

        let now = self.engine.now();
        let history = WeatherSeries::new(request.history);

        Ok(self.respond(
            "request",
            &location,
            now,
            request.current,
            &history,
            &request.patterns,
        ))
    }

    fn respond(
        &self,
        source: &'static str,
        location: &str,
        now: chrono::DateTime<chrono::Utc>,
        current: Option<WeatherSnapshot>,
        history: &WeatherSeries,
        patterns: &[WeatherPattern],
    ) -> RecommendationsResponse {
        let recommendations = self
            .engine
            .derive_at(now, current.as_ref(), history, patterns);

        metrics::counter!("farmcast_recommendations_derived_total", "source" => source)
            .increment(1);
        metrics::histogram!("farmcast_recommendations_per_request")
            .record(recommendations.len() as f64);

        tracing::info!(
            location = %location,
            source,
            count = recommendations.len(),
            "Recommendations generated"
        );

        RecommendationsResponse {
            location: location.to_string(),
            season: self.engine.season_at(now).label().to_string(),
            generated_at: now,
            current,
            count: recommendations.len(),
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::recommendations::engine::EngineSettings;
    use crate::weather::store::FarmDataStore;
    use chrono::{DateTime, TimeZone, Utc};
    use indexmap::IndexMap;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 5, 10, 0, 0).unwrap()
    }

    fn service_with(store: Arc<FarmDataStore>) -> RecommendationService {
        let engine = RecommendationEngine::new(EngineSettings::default(), Arc::new(FixedClock(now())));
        RecommendationService::new(engine, store.clone(), store, 30)
    }

    fn reading(days_ago: i64, temperature: f64, humidity: f64, precipitation: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature,
            humidity,
            precipitation,
            wind_speed: 14.0,
            timestamp: now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_unknown_location_gets_defaults() {
        let service = service_with(Arc::new(FarmDataStore::new(100)));
        let response = service.for_location("Gweru").unwrap();

        assert_eq!(response.count, 3);
        assert_eq!(response.season, "Dry Season");
        assert!(response.current.is_none());
        assert_eq!(response.recommendations[0].title, "Dry Season Harvest Guide");
    }

    #[test]
    fn test_stored_data_drives_rules() {
        let store = Arc::new(FarmDataStore::new(100));
        store.record_observations(
            "Gweru",
            vec![reading(2, 33.0, 40.0, 0.0), reading(1, 31.0, 40.0, 1.0)],
        );
        let service = service_with(store);

        let response = service.for_location("gweru").unwrap();
        let titles: Vec<&str> = response
            .recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "High Temperature Alert",
                "Dry Conditions – Irrigation Needed",
                "Dry Season Management"
            ]
        );
        assert_eq!(response.current.unwrap().temperature, 31.0);
        assert_eq!(response.generated_at, now());
    }

    #[test]
    fn test_stored_patterns_come_first() {
        let store = Arc::new(FarmDataStore::new(100));
        store.replace_patterns(
            "Gweru",
            vec![WeatherPattern {
                id: "dry-spell".to_string(),
                pattern_type: "Precipitation Pattern".to_string(),
                severity: 0.75,
                description: "Mid-season dry spell".to_string(),
                location: "Gweru".to_string(),
                recommendations: vec!["Irrigate maize at tasseling".to_string()],
                statistics: IndexMap::new(),
            }],
        );
        let service = service_with(store);

        let response = service.for_location("Gweru").unwrap();
        assert_eq!(response.count, 2);
        assert_eq!(response.recommendations[0].id, "rec_dry-spell");
        assert_eq!(response.recommendations[1].title, "Dry Season Management");
    }

    #[test]
    fn test_empty_location() {
        let service = service_with(Arc::new(FarmDataStore::new(100)));
        assert!(matches!(
            service.for_location("  "),
            Err(RecommendationError::EmptyLocation)
        ));
    }

    #[test]
    fn test_derive_from_request() {
        let service = service_with(Arc::new(FarmDataStore::new(100)));
        let request = DeriveRequest {
            current: None,
            history: vec![reading(1, 32.0, 80.0, 2.0), reading(3, 32.0, 80.0, 3.0)],
            patterns: vec![],
            location: None,
        };

        let response = service.derive(request).unwrap();
        assert_eq!(response.location, "Your Farm");
        assert_eq!(response.count, 4);
    }

    #[test]
    fn test_derive_rejects_invalid_input() {
        let service = service_with(Arc::new(FarmDataStore::new(100)));

        let request = DeriveRequest {
            current: Some(reading(0, 25.0, 120.0, 0.0)),
            history: vec![],
            patterns: vec![],
            location: Some("Gweru".to_string()),
        };
        let err = service.derive(request).unwrap_err();
        assert!(matches!(err, RecommendationError::InvalidObservation(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let request = DeriveRequest {
            current: None,
            history: vec![],
            patterns: vec![WeatherPattern {
                id: "p".to_string(),
                pattern_type: "Humidity Pattern".to_string(),
                severity: 0.5,
                description: String::new(),
                location: "Gweru".to_string(),
                recommendations: vec![],
                statistics: IndexMap::new(),
            }],
            location: None,
        };
        let err = service.derive(request).unwrap_err();
        assert_eq!(err.error_code(), Some("INVALID_PATTERN"));
    }

    #[test]
    fn test_oversized_window_reads_all_history() {
        let store = Arc::new(FarmDataStore::new(100));
        store.record_observations("Gweru", vec![reading(400, 33.0, 40.0, 0.0)]);
        let engine = RecommendationEngine::new(EngineSettings::default(), Arc::new(FixedClock(now())));
        let service = RecommendationService::new(engine, store.clone(), store, 1_000_000_000);

        let response = service.for_location("Gweru").unwrap();
        assert_eq!(response.recommendations[0].title, "High Temperature Alert");
        assert_eq!(response.count, 3);
    }
}
