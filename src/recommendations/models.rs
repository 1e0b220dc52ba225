use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::weather::models::{WeatherPattern, WeatherSnapshot};

/// Urgency shown on a recommendation badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Map a pattern severity onto a priority.
    ///
    /// Boundaries fall into the lower bucket: exactly 0.7 is Medium and
    /// exactly 0.4 is Low. NaN is Low.
    pub fn from_severity(severity: f64) -> Self {
        if severity > 0.7 {
            Priority::High
        } else if severity > 0.4 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

/// Recommendation category labels
///
/// `HumidityControl` (pattern-derived) and `DiseasePrevention` (aggregate
/// rule) are kept apart even though both concern humidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Category {
    #[serde(rename = "Temperature Management")]
    TemperatureManagement,
    #[serde(rename = "Irrigation")]
    Irrigation,
    #[serde(rename = "Humidity Control")]
    HumidityControl,
    #[serde(rename = "Disease Prevention")]
    DiseasePrevention,
    #[serde(rename = "Water Management")]
    WaterManagement,
    #[serde(rename = "Seasonal Planning")]
    SeasonalPlanning,
    #[serde(rename = "Data Management")]
    DataManagement,
    #[serde(rename = "Best Practices")]
    BestPractices,
    #[serde(rename = "General")]
    General,
}

impl Category {
    /// Category for a detected pattern's type label (case-insensitive)
    pub fn from_pattern_type(pattern_type: &str) -> Self {
        match pattern_type.trim().to_lowercase().as_str() {
            "temperature trend" => Category::TemperatureManagement,
            "precipitation pattern" => Category::Irrigation,
            "humidity pattern" => Category::HumidityControl,
            _ => Category::General,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::TemperatureManagement => "Temperature Management",
            Category::Irrigation => "Irrigation",
            Category::HumidityControl => "Humidity Control",
            Category::DiseasePrevention => "Disease Prevention",
            Category::WaterManagement => "Water Management",
            Category::SeasonalPlanning => "Seasonal Planning",
            Category::DataManagement => "Data Management",
            Category::BestPractices => "Best Practices",
            Category::General => "General",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An agricultural recommendation with a checklist of actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub location: String,
    pub crop_type: String,
    /// Never empty
    pub actions: Vec<String>,
    /// Metrics that drove the decision
    pub conditions: IndexMap<String, f64>,
}

// ============================================================================
// API Request/Response Models
// ============================================================================

/// Inputs for a one-off derivation
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeriveRequest {
    #[serde(default)]
    pub current: Option<WeatherSnapshot>,
    #[serde(default)]
    pub history: Vec<WeatherSnapshot>,
    #[serde(default)]
    pub patterns: Vec<WeatherPattern>,
    /// Label echoed in the response
    #[serde(default)]
    pub location: Option<String>,
}

/// Derived recommendations for a location
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub location: String,
    pub season: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<WeatherSnapshot>,
    pub count: usize,
    pub recommendations: Vec<Recommendation>,
}
