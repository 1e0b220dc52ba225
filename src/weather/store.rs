use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::models::{WeatherPattern, WeatherSeries, WeatherSnapshot};
use super::provider::{PatternAnalyzer, WeatherProvider};

/// In-memory observations and detected patterns, keyed by normalized location
pub struct FarmDataStore {
    data: DashMap<String, LocationData>,
    max_observations: usize,
}

#[derive(Default)]
struct LocationData {
    /// Kept sorted by timestamp
    observations: Vec<WeatherSnapshot>,
    patterns: Vec<WeatherPattern>,
}

/// Normalize a location string for use as a store key
pub fn normalize_location_key(location: &str) -> String {
    location.trim().to_lowercase()
}

impl FarmDataStore {
    pub fn new(max_observations: usize) -> Self {
        Self {
            data: DashMap::new(),
            max_observations: max_observations.max(1),
        }
    }

    /// Add readings for a location, dropping the oldest beyond the cap.
    /// Returns the number of readings now stored for the location.
    pub fn record_observations(&self, location: &str, snapshots: Vec<WeatherSnapshot>) -> usize {
        let mut entry = self
            .data
            .entry(normalize_location_key(location))
            .or_default();

        entry.observations.extend(snapshots);
        entry.observations.sort_by_key(|s| s.timestamp);

        let len = entry.observations.len();
        if len > self.max_observations {
            let excess = len - self.max_observations;
            entry.observations.drain(..excess);
            tracing::debug!(
                location = %location,
                dropped = excess,
                "Observation cap reached, dropped oldest readings"
            );
        }

        entry.observations.len()
    }

    /// Replace the detected patterns for a location
    pub fn replace_patterns(&self, location: &str, patterns: Vec<WeatherPattern>) {
        self.data
            .entry(normalize_location_key(location))
            .or_default()
            .patterns = patterns;
    }

    /// Number of locations with any stored data
    pub fn location_count(&self) -> usize {
        self.data.len()
    }
}

impl WeatherProvider for FarmDataStore {
    fn current_weather(&self, location: &str) -> Option<WeatherSnapshot> {
        self.data
            .get(&normalize_location_key(location))
            .and_then(|entry| entry.observations.last().cloned())
    }

    fn historical_series(&self, location: &str, since: DateTime<Utc>) -> WeatherSeries {
        let Some(entry) = self.data.get(&normalize_location_key(location)) else {
            return WeatherSeries::default();
        };

        let window: Vec<WeatherSnapshot> = entry
            .observations
            .iter()
            .filter(|s| s.timestamp >= since)
            .cloned()
            .collect();

        WeatherSeries::new(window)
    }
}

impl PatternAnalyzer for FarmDataStore {
    fn detected_patterns(&self, location: &str) -> Vec<WeatherPattern> {
        self.data
            .get(&normalize_location_key(location))
            .map(|entry| entry.patterns.clone())
            .unwrap_or_default()
    }
}
