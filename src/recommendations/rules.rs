use super::models::{Category, Priority};
use crate::weather::models::SeriesAggregates;

/// Which aggregate a rule reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    AvgTemp,
    AvgHumidity,
    TotalPrecip,
}

impl Metric {
    /// Key used in a recommendation's `conditions` map
    pub fn key(&self) -> &'static str {
        match self {
            Metric::AvgTemp => "avgTemp",
            Metric::AvgHumidity => "avgHumidity",
            Metric::TotalPrecip => "totalPrecip",
        }
    }

    pub fn read(&self, agg: &SeriesAggregates) -> f64 {
        match self {
            Metric::AvgTemp => agg.avg_temp,
            Metric::AvgHumidity => agg.avg_humidity,
            Metric::TotalPrecip => agg.total_precip,
        }
    }
}

/// Strict comparison against a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Above,
    Below,
}

/// One row of the aggregate policy table
#[derive(Debug)]
pub struct AggregateRule {
    pub key: &'static str,
    pub metric: Metric,
    pub comparison: Comparison,
    pub threshold: f64,
    pub title: &'static str,
    /// `{value}` is replaced by the measured value
    pub description: &'static str,
    pub category: Category,
    pub priority: Priority,
    pub actions: &'static [&'static str],
}

impl AggregateRule {
    /// Measured value when the rule fires
    pub fn triggered_by(&self, agg: &SeriesAggregates) -> Option<f64> {
        let value = self.metric.read(agg);
        let fires = match self.comparison {
            Comparison::Above => value > self.threshold,
            Comparison::Below => value < self.threshold,
        };
        fires.then_some(value)
    }

    pub fn describe(&self, value: f64) -> String {
        self.description.replace("{value}", &format!("{:.1}", value))
    }
}

/// Aggregate rules in evaluation order: temperature, humidity, precipitation
pub static AGGREGATE_RULES: &[AggregateRule] = &[
    AggregateRule {
        key: "high_temperature",
        metric: Metric::AvgTemp,
        comparison: Comparison::Above,
        threshold: 30.0,
        title: "High Temperature Alert",
        description: "Average temperature of {value}°C is above 30°C. Crops are at risk of heat stress and moisture loss.",
        category: Category::TemperatureManagement,
        priority: Priority::High,
        actions: &[
            "Increase irrigation frequency, watering early morning or late evening",
            "Apply mulch to conserve soil moisture and keep roots cool",
            "Provide shade netting for seedlings and sensitive crops",
            "Monitor livestock for heat stress and ensure access to water",
        ],
    },
    AggregateRule {
        key: "cool_temperature",
        metric: Metric::AvgTemp,
        comparison: Comparison::Below,
        threshold: 20.0,
        title: "Cool Temperature Advisory",
        description: "Average temperature of {value}°C is below 20°C. Growth of warm-season crops will slow.",
        category: Category::TemperatureManagement,
        priority: Priority::Medium,
        actions: &[
            "Delay planting of warm-season crops such as maize and groundnuts",
            "Protect seedlings from frost with covers overnight",
            "Consider cool-season crops such as wheat, peas and leafy greens",
        ],
    },
    AggregateRule {
        key: "high_humidity",
        metric: Metric::AvgHumidity,
        comparison: Comparison::Above,
        threshold: 75.0,
        title: "High Humidity Alert",
        description: "Average humidity of {value}% is above 75%. Fungal disease pressure is elevated.",
        category: Category::DiseasePrevention,
        priority: Priority::High,
        actions: &[
            "Scout crops for signs of fungal disease such as blight and mildew",
            "Improve air circulation by spacing and pruning plants",
            "Apply preventive fungicide where disease history exists",
            "Avoid overhead irrigation late in the day",
        ],
    },
    AggregateRule {
        key: "dry_conditions",
        metric: Metric::TotalPrecip,
        comparison: Comparison::Below,
        threshold: 10.0,
        title: "Dry Conditions – Irrigation Needed",
        description: "Only {value}mm of rain recorded over the period. Soil moisture is likely insufficient.",
        category: Category::Irrigation,
        priority: Priority::High,
        actions: &[
            "Schedule supplemental irrigation for actively growing crops",
            "Check soil moisture at root depth before watering",
            "Prioritise water for crops at flowering and grain fill",
            "Mulch exposed soil to reduce evaporation",
        ],
    },
    AggregateRule {
        key: "heavy_rainfall",
        metric: Metric::TotalPrecip,
        comparison: Comparison::Above,
        threshold: 50.0,
        title: "Heavy Rainfall – Drainage Advisory",
        description: "{value}mm of rain recorded over the period. Waterlogging and nutrient leaching are likely.",
        category: Category::WaterManagement,
        priority: Priority::Medium,
        actions: &[
            "Clear drainage channels and furrows",
            "Avoid working waterlogged soil to prevent compaction",
            "Top-dress nitrogen once fields drain to replace leached nutrients",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(avg_temp: f64, avg_humidity: f64, total_precip: f64) -> SeriesAggregates {
        SeriesAggregates {
            avg_temp,
            avg_humidity,
            total_precip,
            sample_count: 1,
        }
    }

    fn fired(agg: &SeriesAggregates) -> Vec<&'static str> {
        AGGREGATE_RULES
            .iter()
            .filter(|r| r.triggered_by(agg).is_some())
            .map(|r| r.key)
            .collect()
    }

    #[test]
    fn test_every_rule_has_actions() {
        assert!(AGGREGATE_RULES.iter().all(|r| !r.actions.is_empty()));
    }

    #[test]
    fn test_neutral_conditions_fire_nothing() {
        assert!(fired(&agg(25.0, 50.0, 25.0)).is_empty());
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert!(fired(&agg(30.0, 75.0, 10.0)).is_empty());
        assert!(fired(&agg(20.0, 50.0, 50.0)).is_empty());
    }

    #[test]
    fn test_multiple_rules_fire_in_table_order() {
        assert_eq!(
            fired(&agg(32.0, 80.0, 5.0)),
            vec!["high_temperature", "high_humidity", "dry_conditions"]
        );
        assert_eq!(
            fired(&agg(15.0, 50.0, 80.0)),
            vec!["cool_temperature", "heavy_rainfall"]
        );
    }

    #[test]
    fn test_describe_includes_value() {
        let rule = &AGGREGATE_RULES[0];
        assert!(rule.describe(31.26).contains("31.3"));
    }
}
