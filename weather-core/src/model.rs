use serde::{Deserialize, Serialize};

/// Normalized current conditions for a single city lookup.
///
/// Only ever built from a complete provider response; there is no partial form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    /// Name as returned by the provider, which may differ from the query.
    pub city_name: String,
    pub temperature_celsius: f64,
    pub wind_speed_mps: f64,
    /// Relative humidity, 0..=100.
    pub humidity_pct: u8,
    /// Free text, e.g. "light rain".
    pub condition_description: String,
}
