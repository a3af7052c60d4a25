use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{PipelineError, Stage},
    model::{LocationInfo, RawWeatherResponse},
    provider::fetch_body,
    units::TemperatureUnit,
};

use super::WeatherSource;

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeather "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    api_key: String,
    url: String,
    http: Client,
}

impl OpenWeatherSource {
    pub fn new(api_key: String, url: String, http: Client) -> Self {
        Self { api_key, url, http }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherSource {
    async fn current(
        &self,
        location: &LocationInfo,
        unit: TemperatureUnit,
    ) -> Result<RawWeatherResponse, PipelineError> {
        let q = location.query();
        tracing::debug!(
            url = %self.url,
            q = %q,
            units = unit.api_param(),
            "requesting current weather"
        );

        let request = self.http.get(&self.url).query(&[
            ("q", q.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", unit.api_param()),
            ("lang", "en"),
        ]);

        let body = fetch_body(request, Stage::Weather).await?;

        serde_json::from_str(&body).map_err(|e| PipelineError::MalformedResponse {
            stage: Stage::Weather,
            reason: e.to_string(),
        })
    }
}
