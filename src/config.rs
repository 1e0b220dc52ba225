use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::recommendations::engine::EngineSettings;
use crate::recommendations::season::DEFAULT_WET_SEASON_MONTHS;

/// Longest history window accepted (100 years)
pub const MAX_HISTORY_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// API key for observation/pattern ingest (optional - if not set, no auth required)
    #[serde(default)]
    pub ingest_api_key: Option<String>,

    /// Days of history the aggregate rules look back over
    #[serde(default = "default_history_window_days")]
    pub history_window_days: i64,

    /// Readings kept per location before the oldest are dropped
    #[serde(default = "default_max_observations")]
    pub max_observations_per_location: usize,

    /// Recommendation ids the action checklist will track at once
    #[serde(default = "default_max_tracked_recommendations")]
    pub max_tracked_recommendations: usize,

    /// Action indices accepted per recommendation (0..N)
    #[serde(default = "default_max_actions_per_recommendation")]
    pub max_actions_per_recommendation: usize,

    /// Farm and regional settings
    #[serde(default)]
    pub farm: FarmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FarmConfig {
    /// Location used when a request names none; also labels rule output
    #[serde(default = "default_location")]
    pub default_location: String,

    /// Region label for seasonal guidance
    #[serde(default = "default_region")]
    pub region: String,

    /// IANA timezone the calendar month is read in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Months (1-12) classified as the wet season
    #[serde(default = "default_wet_season_months")]
    pub wet_season_months: Vec<u32>,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            default_location: default_location(),
            region: default_region(),
            timezone: default_timezone(),
            wet_season_months: default_wet_season_months(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_history_window_days() -> i64 {
    30
}

fn default_max_observations() -> usize {
    5000
}

fn default_max_tracked_recommendations() -> usize {
    10_000
}

fn default_max_actions_per_recommendation() -> usize {
    32
}

fn default_location() -> String {
    "Your Farm".to_string()
}

fn default_region() -> String {
    "Zimbabwe".to_string()
}

fn default_timezone() -> String {
    "Africa/Harare".to_string()
}

fn default_wet_season_months() -> Vec<u32> {
    DEFAULT_WET_SEASON_MONTHS.to_vec()
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Start with defaults
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("history_window_days", default_history_window_days())?
            // Add config file if present (config.toml, config.yaml, etc.)
            .add_source(File::with_name("config").required(false))
            // Local overrides, kept out of version control
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with FARMCAST_)
            // e.g. FARMCAST_FARM__TIMEZONE=Africa/Lusaka
            .add_source(
                Environment::with_prefix("FARMCAST")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("farm.wet_season_months"),
            )
            .build()?;

        // Deserialize, then reject values the services can't run with
        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_HISTORY_WINDOW_DAYS).contains(&self.history_window_days) {
            return Err(ConfigError::Message(format!(
                "history_window_days must be between 1 and {}, got {}",
                MAX_HISTORY_WINDOW_DAYS, self.history_window_days
            )));
        }
        if self.max_tracked_recommendations == 0 || self.max_actions_per_recommendation == 0 {
            return Err(ConfigError::Message(
                "max_tracked_recommendations and max_actions_per_recommendation must be positive"
                    .to_string(),
            ));
        }
        if let Some(month) = self
            .farm
            .wet_season_months
            .iter()
            .find(|m| !(1..=12).contains(*m))
        {
            return Err(ConfigError::Message(format!(
                "farm.wet_season_months contains invalid month {}",
                month
            )));
        }
        self.engine_settings().map(|_| ())
    }

    /// Engine settings derived from the farm section
    pub fn engine_settings(&self) -> Result<EngineSettings, ConfigError> {
        let timezone = self.farm.timezone.parse::<chrono_tz::Tz>().map_err(|_| {
            ConfigError::Message(format!("Invalid farm.timezone: {}", self.farm.timezone))
        })?;

        Ok(EngineSettings {
            farm_location: self.farm.default_location.clone(),
            region: self.farm.region.clone(),
            timezone,
            wet_season_months: self.farm.wet_season_months.clone(),
        })
    }
}
