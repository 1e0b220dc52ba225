use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Duration;
use thiserror::Error;

use super::models::{
    round_2, IngestResponse, SeriesSummaryResponse, WeatherPattern, WeatherSnapshot,
};
use super::provider::WeatherProvider;
use super::store::FarmDataStore;
use crate::clock::{window_days, window_start, Clock};
use crate::error::HttpError;
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum WeatherDataError {
    #[error("Location must not be empty")]
    EmptyLocation,

    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("No weather data recorded for {0}")]
    NoData(String),
}

impl HttpError for WeatherDataError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyLocation => StatusCode::BAD_REQUEST,
            Self::InvalidObservation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidPattern(_) => StatusCode::BAD_REQUEST,
            Self::NoData(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::EmptyLocation => Some("EMPTY_LOCATION"),
            Self::InvalidObservation(_) => Some("INVALID_OBSERVATION"),
            Self::InvalidPattern(_) => Some("INVALID_PATTERN"),
            Self::NoData(_) => Some("NO_DATA"),
        }
    }
}

impl_into_response!(WeatherDataError);

/// Ingest and summary operations over the farm data store
pub struct WeatherDataService {
    store: Arc<FarmDataStore>,
    clock: Arc<dyn Clock>,
    history_window: Duration,
}

impl WeatherDataService {
    pub fn new(store: Arc<FarmDataStore>, clock: Arc<dyn Clock>, history_window_days: i64) -> Self {
        Self {
            store,
            clock,
            history_window: window_days(history_window_days),
        }
    }

    pub fn history_window_days(&self) -> i64 {
        self.history_window.num_days()
    }

    /// Validate and store a batch of readings. The batch is rejected whole
    /// if any reading is invalid.
    pub fn record_observations(
        &self,
        location: &str,
        snapshots: Vec<WeatherSnapshot>,
    ) -> Result<IngestResponse, WeatherDataError> {
        let location = require_location(location)?;

        for (i, snapshot) in snapshots.iter().enumerate() {
            snapshot
                .validate()
                .map_err(|e| WeatherDataError::InvalidObservation(format!("#{}: {}", i, e)))?;
        }

        let accepted = snapshots.len();
        let stored = self.store.record_observations(location, snapshots);

        metrics::counter!("farmcast_observations_ingested_total").increment(accepted as u64);
        tracing::info!(
            location = %location,
            accepted,
            stored,
            locations = self.store.location_count(),
            "Observations recorded"
        );

        Ok(IngestResponse {
            location: location.to_string(),
            accepted,
            stored,
        })
    }

    /// Replace the detected patterns for a location
    pub fn replace_patterns(
        &self,
        location: &str,
        patterns: Vec<WeatherPattern>,
    ) -> Result<usize, WeatherDataError> {
        let location = require_location(location)?;

        for pattern in &patterns {
            pattern.validate().map_err(WeatherDataError::InvalidPattern)?;
        }

        let count = patterns.len();
        self.store.replace_patterns(location, patterns);

        tracing::info!(location = %location, count, "Detected patterns replaced");

        Ok(count)
    }

    /// Aggregates over the history window
    pub fn summary(&self, location: &str) -> Result<SeriesSummaryResponse, WeatherDataError> {
        let location = require_location(location)?;
        let since = window_start(self.clock.now(), self.history_window);
        let series = self.store.historical_series(location, since);

        let agg = series
            .aggregates()
            .ok_or_else(|| WeatherDataError::NoData(location.to_string()))?;

        Ok(SeriesSummaryResponse {
            location: location.to_string(),
            window_days: self.history_window_days(),
            sample_count: agg.sample_count,
            avg_temp: round_2(agg.avg_temp),
            avg_humidity: round_2(agg.avg_humidity),
            total_precip: round_2(agg.total_precip),
            latest: series.latest().cloned(),
        })
    }
}

fn require_location(location: &str) -> Result<&str, WeatherDataError> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err(WeatherDataError::EmptyLocation);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{DateTime, TimeZone, Utc};
    use indexmap::IndexMap;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap()
    }

    fn service() -> WeatherDataService {
        WeatherDataService::new(
            Arc::new(FarmDataStore::new(100)),
            Arc::new(FixedClock(now())),
            30,
        )
    }

    fn reading(days_ago: i64, temperature: f64, precipitation: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature,
            humidity: 65.0,
            precipitation,
            wind_speed: 9.0,
            timestamp: now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_record_and_summarize() {
        let service = service();
        let response = service
            .record_observations(
                " Harare ",
                vec![reading(3, 24.0, 1.0), reading(2, 26.0, 2.5), reading(1, 25.0, 0.0)],
            )
            .unwrap();
        assert_eq!(response.location, "Harare");
        assert_eq!(response.accepted, 3);
        assert_eq!(response.stored, 3);

        let summary = service.summary("harare").unwrap();
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.avg_temp, 25.0);
        assert_eq!(summary.total_precip, 3.5);
        assert_eq!(summary.window_days, 30);
        assert_eq!(summary.latest.unwrap().temperature, 25.0);
    }

    #[test]
    fn test_summary_ignores_readings_outside_window() {
        let service = service();
        service
            .record_observations("Harare", vec![reading(45, 10.0, 0.0), reading(1, 30.0, 0.0)])
            .unwrap();

        let summary = service.summary("Harare").unwrap();
        assert_eq!(summary.sample_count, 1);
        assert_eq!(summary.avg_temp, 30.0);
    }

    #[test]
    fn test_summary_without_data() {
        let err = service().summary("Harare").unwrap_err();
        assert!(matches!(err, WeatherDataError::NoData(_)));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_batch_is_rejected_whole() {
        let service = service();
        let mut bad = reading(1, 25.0, 0.0);
        bad.humidity = 140.0;

        let err = service
            .record_observations("Harare", vec![reading(2, 25.0, 0.0), bad])
            .unwrap_err();
        assert!(matches!(err, WeatherDataError::InvalidObservation(_)));
        assert_eq!(err.error_code(), Some("INVALID_OBSERVATION"));
        assert!(matches!(service.summary("Harare"), Err(WeatherDataError::NoData(_))));
    }

    #[test]
    fn test_empty_location_rejected() {
        let err = service().record_observations("   ", vec![]).unwrap_err();
        assert!(matches!(err, WeatherDataError::EmptyLocation));
    }

    #[test]
    fn test_replace_patterns_validates() {
        let service = service();
        let pattern = WeatherPattern {
            id: "p1".to_string(),
            pattern_type: "Precipitation Pattern".to_string(),
            severity: 1.5,
            description: "Erratic rain".to_string(),
            location: "Harare".to_string(),
            recommendations: vec!["Harvest water".to_string()],
            statistics: IndexMap::new(),
        };

        let err = service
            .replace_patterns("Harare", vec![pattern.clone()])
            .unwrap_err();
        assert!(matches!(err, WeatherDataError::InvalidPattern(_)));

        let valid = WeatherPattern {
            severity: 0.5,
            ..pattern
        };
        assert_eq!(service.replace_patterns("Harare", vec![valid]).unwrap(), 1);
    }

    #[test]
    fn test_summary_with_oversized_window() {
        let service = WeatherDataService::new(
            Arc::new(FarmDataStore::new(100)),
            Arc::new(FixedClock(now())),
            i64::MAX,
        );
        service
            .record_observations("Harare", vec![reading(4000, 18.0, 1.0)])
            .unwrap();

        let summary = service.summary("Harare").unwrap();
        assert_eq!(summary.sample_count, 1);
        assert_eq!(summary.avg_temp, 18.0);
    }
}
