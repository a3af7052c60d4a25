use serde::{Deserialize, Serialize};

use crate::units::Temperature;

/// Where the viewer is, as reported by the location provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub city: String,
    pub country: String,
}

impl LocationInfo {
    /// `q` parameter for the weather request, e.g. `"Lisbon,PT"`.
    pub fn query(&self) -> String {
        format!("{},{}", self.city, self.country)
    }
}

/// Current-weather payload from OpenWeather.
///
/// Everything is optional: the payload is untrusted and the normalizer reports
/// exactly which field is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWeatherResponse {
    pub name: Option<String>,
    pub sys: Option<RawSys>,
    pub main: Option<RawMain>,
    pub wind: Option<RawWind>,
    pub weather: Option<Vec<RawCondition>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSys {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMain {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWind {
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCondition {
    pub id: Option<i64>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Canonical weather for one fetch. Replaced, never mutated, by the next fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub city: String,
    pub country: String,
    /// Condition descriptions in provider order; never empty.
    pub descriptions: Vec<String>,
    pub temperature: Temperature,
    pub sunrise_unix: i64,
    pub sunset_unix: i64,
    pub humidity_percent: f64,
    pub wind_speed: f64,
    pub condition_code: i64,
    pub icon_day_flag: bool,
}

impl WeatherRecord {
    pub fn description(&self) -> String {
        self.descriptions.join(", ")
    }

    pub fn location_label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}
