use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Observations
// ============================================================================

/// A single weather reading for a farm location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Air temperature in °C
    pub temperature: f64,
    /// Relative humidity in percent (0-100)
    pub humidity: f64,
    /// Precipitation in mm
    pub precipitation: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    pub timestamp: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Reject readings that no sensor or importer should produce
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("precipitation", self.precipitation),
            ("windSpeed", self.wind_speed),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{} must be a finite number", name));
        }
        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(format!(
                "humidity must be between 0 and 100, got {}",
                self.humidity
            ));
        }
        if self.precipitation < 0.0 {
            return Err(format!(
                "precipitation must not be negative, got {}",
                self.precipitation
            ));
        }
        if self.wind_speed < 0.0 {
            return Err(format!(
                "windSpeed must not be negative, got {}",
                self.wind_speed
            ));
        }
        Ok(())
    }
}

/// Request body for observation ingest: one reading or a batch
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ObservationBatch {
    One(WeatherSnapshot),
    Many(Vec<WeatherSnapshot>),
}

impl ObservationBatch {
    pub fn into_vec(self) -> Vec<WeatherSnapshot> {
        match self {
            Self::One(snapshot) => vec![snapshot],
            Self::Many(snapshots) => snapshots,
        }
    }
}

// ============================================================================
// Series and aggregates
// ============================================================================

/// Readings over a time window, ordered oldest to newest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSeries(Vec<WeatherSnapshot>);

/// Summary statistics the aggregate rules run against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesAggregates {
    pub avg_temp: f64,
    pub avg_humidity: f64,
    pub total_precip: f64,
    pub sample_count: usize,
}

impl WeatherSeries {
    /// Build a series, sorting readings by timestamp
    pub fn new(mut snapshots: Vec<WeatherSnapshot>) -> Self {
        snapshots.sort_by_key(|s| s.timestamp);
        Self(snapshots)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn snapshots(&self) -> &[WeatherSnapshot] {
        &self.0
    }

    /// Newest reading in the series
    pub fn latest(&self) -> Option<&WeatherSnapshot> {
        self.0.last()
    }

    /// Mean temperature, mean humidity and total precipitation.
    /// `None` for an empty series.
    pub fn aggregates(&self) -> Option<SeriesAggregates> {
        if self.0.is_empty() {
            return None;
        }

        let n = self.0.len() as f64;
        let avg_temp = self.0.iter().map(|s| s.temperature).sum::<f64>() / n;
        let avg_humidity = self.0.iter().map(|s| s.humidity).sum::<f64>() / n;
        let total_precip = self.0.iter().map(|s| s.precipitation).sum::<f64>();

        Some(SeriesAggregates {
            avg_temp,
            avg_humidity,
            total_precip,
            sample_count: self.0.len(),
        })
    }
}

impl From<Vec<WeatherSnapshot>> for WeatherSeries {
    fn from(snapshots: Vec<WeatherSnapshot>) -> Self {
        Self::new(snapshots)
    }
}

// ============================================================================
// Detected patterns
// ============================================================================

/// A recurring condition reported by the pattern analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherPattern {
    pub id: String,
    /// Free-form label, e.g. "Temperature Trend"
    pub pattern_type: String,
    /// 0.0 (negligible) to 1.0 (severe)
    pub severity: f64,
    pub description: String,
    pub location: String,
    /// Suggested actions, in the order the analyzer ranked them
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub statistics: IndexMap<String, f64>,
}

impl WeatherPattern {
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("pattern id must not be empty".to_string());
        }
        if !self.severity.is_finite() || !(0.0..=1.0).contains(&self.severity) {
            return Err(format!(
                "pattern {} severity must be between 0 and 1, got {}",
                self.id, self.severity
            ));
        }
        if self.recommendations.is_empty() {
            return Err(format!(
                "pattern {} must carry at least one recommendation",
                self.id
            ));
        }
        Ok(())
    }
}

// ============================================================================
// API Response Models
// ============================================================================

/// Aggregates over a location's stored history window
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummaryResponse {
    pub location: String,
    pub window_days: i64,
    pub sample_count: usize,
    pub avg_temp: f64,
    pub avg_humidity: f64,
    pub total_precip: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<WeatherSnapshot>,
}

/// Response for observation ingest
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub location: String,
    pub accepted: usize,
    pub stored: usize,
}

pub(crate) fn round_2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}
