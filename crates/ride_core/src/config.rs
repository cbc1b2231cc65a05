//! Runtime configuration loaded from the environment.

use std::time::Duration;

use config::{ConfigError, Environment};
use dotenv::dotenv;
use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::geo::AverageSpeed;
use crate::location::WatchThresholds;

/// Default Geoapify-compatible geocoding endpoint.
const DEFAULT_GEOCODING_ENDPOINT: &str = "https://api.geoapify.com";

/// Default roster refresh period (seconds).
const DEFAULT_ROSTER_TICK_SECS: u64 = 10;

/// Default watch thresholds: one update per 10 s or 20 m of movement.
const DEFAULT_LOCATION_TIME_INTERVAL_MS: u64 = 10_000;
const DEFAULT_LOCATION_DISTANCE_INTERVAL_M: f64 = 20.0;

const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Flat service fee added to every fare.
pub const DEFAULT_SERVICE_FEE: f64 = 2.50;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RideConfig {
    /// Key for reverse geocoding and place search.
    pub geoapify_api_key: Option<String>,

    /// Key required to render the map.
    pub google_maps_api_key: Option<String>,

    pub geocoding_endpoint: String,

    pub roster_tick_secs: u64,

    /// Fixed seed for the roster jitter; random when unset.
    pub roster_seed: Option<u64>,

    pub location_time_interval_ms: u64,

    pub location_distance_interval_m: f64,

    pub average_speed_kmh: f64,

    pub search_debounce_ms: u64,

    pub service_fee: f64,
}

impl Default for RideConfig {
    fn default() -> Self {
        Self {
            geoapify_api_key: None,
            google_maps_api_key: None,
            geocoding_endpoint: String::from(DEFAULT_GEOCODING_ENDPOINT),
            roster_tick_secs: DEFAULT_ROSTER_TICK_SECS,
            roster_seed: None,
            location_time_interval_ms: DEFAULT_LOCATION_TIME_INTERVAL_MS,
            location_distance_interval_m: DEFAULT_LOCATION_DISTANCE_INTERVAL_M,
            average_speed_kmh: crate::geo::DEFAULT_AVERAGE_SPEED_KMH,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            service_fee: DEFAULT_SERVICE_FEE,
        }
    }
}

impl RideConfig {
    /// Build from environment variables (a `.env` file is read first when present).
    ///
    /// Variable names are the upper-cased field names, e.g. `GEOAPIFY_API_KEY`
    /// or `ROSTER_TICK_SECS`.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let defaults = RideConfig::default();

        config::Config::builder()
            .set_default("geocoding_endpoint", defaults.geocoding_endpoint)?
            .set_default("roster_tick_secs", defaults.roster_tick_secs)?
            .set_default("location_time_interval_ms", defaults.location_time_interval_ms)?
            .set_default(
                "location_distance_interval_m",
                defaults.location_distance_interval_m,
            )?
            .set_default("average_speed_kmh", defaults.average_speed_kmh)?
            .set_default("search_debounce_ms", defaults.search_debounce_ms)?
            .set_default("service_fee", defaults.service_fee)?
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn require_geoapify_key(&self) -> Result<&str, ConfigurationError> {
        non_empty(self.geoapify_api_key.as_deref()).ok_or(ConfigurationError::MissingCredential {
            feature: "address lookup",
            variable: "GEOAPIFY_API_KEY",
        })
    }

    pub fn require_maps_key(&self) -> Result<&str, ConfigurationError> {
        non_empty(self.google_maps_api_key.as_deref()).ok_or(
            ConfigurationError::MissingCredential {
                feature: "map rendering",
                variable: "GOOGLE_MAPS_API_KEY",
            },
        )
    }

    pub fn average_speed(&self) -> Result<AverageSpeed, ConfigurationError> {
        Ok(AverageSpeed::new(self.average_speed_kmh)?)
    }

    pub fn roster_tick_period(&self) -> Result<Duration, ConfigurationError> {
        if self.roster_tick_secs == 0 {
            return Err(ConfigurationError::Invalid(
                "roster_tick_secs must be at least 1".to_string(),
            ));
        }
        Ok(Duration::from_secs(self.roster_tick_secs))
    }

    pub fn watch_thresholds(&self) -> WatchThresholds {
        WatchThresholds {
            time_interval: Duration::from_millis(self.location_time_interval_ms),
            distance_interval_m: self.location_distance_interval_m.max(0.0),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
