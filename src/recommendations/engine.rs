use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;

use super::models::{Category, Priority, Recommendation};
use super::rules::AGGREGATE_RULES;
use super::season::{self, Season, Template, DEFAULT_WET_SEASON_MONTHS};
use crate::clock::Clock;
use crate::weather::models::{WeatherPattern, WeatherSeries, WeatherSnapshot};

const PATTERN_CROP_TYPE: &str = "General";
const AGGREGATE_CROP_TYPE: &str = "All Crops";

/// Farm-specific values the engine stamps onto its output
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Location label for aggregate-rule recommendations
    pub farm_location: String,
    /// Location label for seasonal guidance
    pub region: String,
    /// Time zone the calendar month is read in
    pub timezone: Tz,
    pub wet_season_months: Vec<u32>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            farm_location: "Your Farm".to_string(),
            region: "Zimbabwe".to_string(),
            timezone: chrono_tz::Africa::Harare,
            wet_season_months: DEFAULT_WET_SEASON_MONTHS.to_vec(),
        }
    }
}

/// Turns weather observations and detected patterns into recommendations.
///
/// Pure apart from reading the injected clock: no I/O, no shared state.
pub struct RecommendationEngine {
    settings: EngineSettings,
    clock: Arc<dyn Clock>,
}

impl RecommendationEngine {
    pub fn new(settings: EngineSettings, clock: Arc<dyn Clock>) -> Self {
        Self { settings, clock }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Season for an instant, using the farm's local calendar month
    pub fn season_at(&self, now: DateTime<Utc>) -> Season {
        let month = now.with_timezone(&self.settings.timezone).month();
        Season::for_month(month, &self.settings.wet_season_months)
    }

    /// Derive recommendations as of the clock's current instant
    pub fn derive(
        &self,
        current: Option<&WeatherSnapshot>,
        history: &WeatherSeries,
        patterns: &[WeatherPattern],
    ) -> Vec<Recommendation> {
        self.derive_at(self.clock.now(), current, history, patterns)
    }

    /// Derive recommendations as of `now`.
    ///
    /// Output order: one entry per pattern (input order), then fired
    /// aggregate rules (table order), then the seasonal context entry. When
    /// there are neither patterns nor history, the three defaults instead.
    pub fn derive_at(
        &self,
        now: DateTime<Utc>,
        current: Option<&WeatherSnapshot>,
        history: &WeatherSeries,
        patterns: &[WeatherPattern],
    ) -> Vec<Recommendation> {
        let season = self.season_at(now);

        let mut recommendations: Vec<Recommendation> = patterns
            .iter()
            .map(|p| from_pattern(p, now))
            .collect();

        if let Some(agg) = history.aggregates() {
            for rule in AGGREGATE_RULES {
                let Some(value) = rule.triggered_by(&agg) else {
                    continue;
                };

                let mut conditions = IndexMap::new();
                conditions.insert(rule.metric.key().to_string(), value);

                recommendations.push(Recommendation {
                    id: stamped_id(rule.key, now),
                    title: rule.title.to_string(),
                    description: rule.describe(value),
                    category: rule.category,
                    priority: rule.priority,
                    created_at: now,
                    location: self.settings.farm_location.clone(),
                    crop_type: AGGREGATE_CROP_TYPE.to_string(),
                    actions: to_owned_actions(rule.actions),
                    conditions,
                });
            }
        }

        if !patterns.is_empty() || !history.is_empty() {
            recommendations.push(from_template(
                season::context_template(season),
                now,
                &self.settings.region,
                PATTERN_CROP_TYPE,
            ));
        }

        if recommendations.is_empty() {
            recommendations = self.defaults(season, now);
        }

        tracing::debug!(
            season = season.label(),
            patterns = patterns.len(),
            samples = history.len(),
            has_current = current.is_some(),
            count = recommendations.len(),
            "Recommendations derived"
        );

        recommendations
    }

    fn defaults(&self, season: Season, now: DateTime<Utc>) -> Vec<Recommendation> {
        vec![
            from_template(
                season::guide_template(season),
                now,
                &self.settings.region,
                PATTERN_CROP_TYPE,
            ),
            from_template(
                season::upload_template(),
                now,
                &self.settings.farm_location,
                AGGREGATE_CROP_TYPE,
            ),
            from_template(
                season::best_practices_template(),
                now,
                &self.settings.farm_location,
                AGGREGATE_CROP_TYPE,
            ),
        ]
    }
}

fn from_pattern(pattern: &WeatherPattern, now: DateTime<Utc>) -> Recommendation {
    Recommendation {
        id: format!("rec_{}", pattern.id),
        title: format!("Action Required: {}", pattern.pattern_type),
        description: pattern.description.clone(),
        category: Category::from_pattern_type(&pattern.pattern_type),
        priority: Priority::from_severity(pattern.severity),
        created_at: now,
        location: pattern.location.clone(),
        crop_type: PATTERN_CROP_TYPE.to_string(),
        actions: pattern.recommendations.clone(),
        conditions: pattern.statistics.clone(),
    }
}

fn from_template(
    template: &Template,
    now: DateTime<Utc>,
    location: &str,
    crop_type: &str,
) -> Recommendation {
    Recommendation {
        id: stamped_id(template.key, now),
        title: template.title.to_string(),
        description: template.description.to_string(),
        category: template.category,
        priority: template.priority,
        created_at: now,
        location: location.to_string(),
        crop_type: crop_type.to_string(),
        actions: to_owned_actions(template.actions),
        conditions: IndexMap::new(),
    }
}

fn stamped_id(key: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}", key, now.timestamp_millis())
}

fn to_owned_actions(actions: &[&str]) -> Vec<String> {
    actions.iter().map(|a| a.to_string()).collect()
}
