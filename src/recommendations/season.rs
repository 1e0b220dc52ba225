use super::models::{Category, Priority};

/// Default wet-season months for southern Africa (November to April)
pub const DEFAULT_WET_SEASON_MONTHS: [u32; 6] = [11, 12, 1, 2, 3, 4];

/// Rainy/dry split used for seasonal guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Wet,
    Dry,
}

impl Season {
    /// Classify a calendar month (1-12)
    pub fn for_month(month: u32, wet_months: &[u32]) -> Self {
        if wet_months.contains(&month) {
            Season::Wet
        } else {
            Season::Dry
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Wet => "Wet Season",
            Season::Dry => "Dry Season",
        }
    }
}

/// Fixed text for a recommendation that does not depend on measurements
#[derive(Debug)]
pub struct Template {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub priority: Priority,
    pub actions: &'static [&'static str],
}

static WET_SEASON_CONTEXT: Template = Template {
    key: "season_wet",
    title: "Wet Season Farming Guide",
    description: "The rains are here. Make the most of soil moisture for planting and early crop establishment.",
    category: Category::SeasonalPlanning,
    priority: Priority::Low,
    actions: &[
        "Plant maize, groundnuts and soybeans after the first effective rains",
        "Apply basal fertilizer at planting",
        "Keep fields weed-free during the first six weeks",
        "Maintain contour ridges and drainage to control runoff",
    ],
};

static DRY_SEASON_CONTEXT: Template = Template {
    key: "season_dry",
    title: "Dry Season Management",
    description: "Rainfall is minimal. Focus on harvest, storage and preparing land for the next season.",
    category: Category::SeasonalPlanning,
    priority: Priority::Low,
    actions: &[
        "Harvest mature crops promptly and dry grain to safe moisture levels",
        "Store grain in clean, pest-proof containers",
        "Prepare land and repair irrigation infrastructure",
        "Grow irrigated winter crops where water is available",
    ],
};

static WET_SEASON_GUIDE: Template = Template {
    key: "default_season_wet",
    title: "Wet Season Planting Guide",
    description: "It is the planting season. Prepare to plant as soon as the rains are established.",
    category: Category::SeasonalPlanning,
    priority: Priority::Low,
    actions: &[
        "Source certified seed and fertilizer before the rains",
        "Plant once the soil is moist to a depth of 30cm",
        "Stagger planting dates to spread risk",
    ],
};

static DRY_SEASON_GUIDE: Template = Template {
    key: "default_season_dry",
    title: "Dry Season Harvest Guide",
    description: "It is harvest and preparation time. Protect this season's yield and plan the next one.",
    category: Category::SeasonalPlanning,
    priority: Priority::Low,
    actions: &[
        "Harvest and dry crops before storage",
        "Treat stored grain against weevils",
        "Plan crop rotation for the coming season",
    ],
};

static UPLOAD_WEATHER_DATA: Template = Template {
    key: "default_upload",
    title: "Upload Weather Data",
    description: "No weather observations are available yet. Upload readings to receive recommendations tailored to your farm.",
    category: Category::DataManagement,
    priority: Priority::Medium,
    actions: &[
        "Record daily temperature, humidity and rainfall",
        "Import readings from a farm weather station",
        "Keep at least a week of history for reliable advice",
    ],
};

static BEST_PRACTICES: Template = Template {
    key: "default_best_practices",
    title: "General Farming Best Practices",
    description: "Good practice that pays off regardless of the weather.",
    category: Category::BestPractices,
    priority: Priority::Low,
    actions: &[
        "Test soil every few seasons and lime acidic soils",
        "Rotate cereals with legumes to maintain fertility",
        "Keep records of inputs, yields and weather",
        "Scout fields weekly for pests and disease",
    ],
};

/// Context entry appended whenever observations or patterns were supplied
pub fn context_template(season: Season) -> &'static Template {
    match season {
        Season::Wet => &WET_SEASON_CONTEXT,
        Season::Dry => &DRY_SEASON_CONTEXT,
    }
}

/// Seasonal guide opening the default set
pub fn guide_template(season: Season) -> &'static Template {
    match season {
        Season::Wet => &WET_SEASON_GUIDE,
        Season::Dry => &DRY_SEASON_GUIDE,
    }
}

pub fn upload_template() -> &'static Template {
    &UPLOAD_WEATHER_DATA
}

pub fn best_practices_template() -> &'static Template {
    &BEST_PRACTICES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_for_month() {
        for month in [11, 12, 1, 2, 3, 4] {
            assert_eq!(Season::for_month(month, &DEFAULT_WET_SEASON_MONTHS), Season::Wet);
        }
        for month in 5..=10 {
            assert_eq!(Season::for_month(month, &DEFAULT_WET_SEASON_MONTHS), Season::Dry);
        }
    }

    #[test]
    fn test_custom_wet_months() {
        assert_eq!(Season::for_month(7, &[6, 7, 8]), Season::Wet);
        assert_eq!(Season::for_month(1, &[6, 7, 8]), Season::Dry);
    }

    #[test]
    fn test_templates_carry_actions() {
        let all = [
            context_template(Season::Wet),
            context_template(Season::Dry),
            guide_template(Season::Wet),
            guide_template(Season::Dry),
            upload_template(),
            best_practices_template(),
        ];
        assert!(all.iter().all(|t| !t.actions.is_empty()));
    }

    #[test]
    fn test_context_titles() {
        assert_eq!(context_template(Season::Wet).title, "Wet Season Farming Guide");
        assert_eq!(context_template(Season::Dry).title, "Dry Season Management");
    }
}
