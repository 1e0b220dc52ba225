use chrono::{DateTime, Utc};

use super::models::{WeatherPattern, WeatherSeries, WeatherSnapshot};

/// Supplies observed weather for a farm location
pub trait WeatherProvider: Send + Sync {
    /// Most recent reading, if any has been recorded
    fn current_weather(&self, location: &str) -> Option<WeatherSnapshot>;

    /// Readings at or after `since`, ordered oldest to newest.
    /// Empty when nothing is known about the location.
    fn historical_series(&self, location: &str, since: DateTime<Utc>) -> WeatherSeries;
}

/// Supplies weather patterns already detected for a farm location
pub trait PatternAnalyzer: Send + Sync {
    fn detected_patterns(&self, location: &str) -> Vec<WeatherPattern>;
}
