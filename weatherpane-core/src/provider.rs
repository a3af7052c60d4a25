use crate::{
    Config, LocationInfo,
    error::{PipelineError, Stage},
    model::RawWeatherResponse,
    provider::openweather::OpenWeatherSource,
    units::TemperatureUnit,
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the current weather for a location.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(
        &self,
        location: &LocationInfo,
        unit: TemperatureUnit,
    ) -> Result<RawWeatherResponse, PipelineError>;
}

/// Shared HTTP client for every collaborator. One attempt, bounded by [`REQUEST_TIMEOUT`].
pub fn http_client() -> anyhow::Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("weatherpane/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// Construct the weather source from config.
pub fn weather_source_from_config(
    config: &Config,
    http: Client,
) -> anyhow::Result<Box<dyn WeatherSource>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: run `weatherpane configure` or set WEATHERPANE_API_KEY."
        )
    })?;

    Ok(Box::new(OpenWeatherSource::new(
        api_key,
        config.weather_url.clone(),
        http,
    )))
}

/// Sends `request` and returns the body of a successful response.
pub(crate) async fn fetch_body(
    request: reqwest::RequestBuilder,
    stage: Stage,
) -> Result<String, PipelineError> {
    let res = request
        .send()
        .await
        .map_err(|source| PipelineError::Network { stage, source })?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| PipelineError::Network { stage, source })?;

    if !status.is_success() {
        return Err(PipelineError::HttpStatus {
            stage,
            status,
            body: truncate_body(&body),
        });
    }

    Ok(body)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
