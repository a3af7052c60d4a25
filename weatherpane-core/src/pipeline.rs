//! End-to-end flow: locate, fetch, normalize, derive.
//!
//! Every step waits for the previous one. The background is the exception: it is
//! spawned as its own task and resolved by the caller whenever it is ready, so the
//! foreground values never wait on image probes.

use chrono::{DateTime, TimeZone, Timelike};
use serde::Serialize;
use std::{fmt::Display, sync::Arc};
use tokio::task::JoinHandle;

use crate::{
    Config,
    background::{AssetProbe, BackgroundDirective, BackgroundPolicy, HttpAssetProbe},
    error::PipelineError,
    icon::resolve_icon,
    location::{IpInfoLocator, LocationProvider},
    model::{LocationInfo, WeatherRecord},
    normalize::normalize,
    provider::{WeatherSource, http_client, weather_source_from_config},
    time_format::{TimeFormat, format_unix_in},
    units::TemperatureUnit,
};

const MISSING_LABEL: &str = "--";

/// Display-ready strings for one weather record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub location_label: String,
    pub temperature_label: String,
    pub description: String,
    pub icon_class: String,
    pub current_time_label: String,
    pub date_label: String,
    pub sunrise_label: String,
    pub sunset_label: String,
    pub humidity_label: String,
    pub wind_label: String,
}

impl Presentation {
    /// Derives labels for `record` as seen at `now`, in `now`'s time zone.
    pub fn derive<Tz>(
        record: &WeatherRecord,
        now: &DateTime<Tz>,
        display_unit: TemperatureUnit,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let tz = now.timezone();
        let label = |secs: i64, format: TimeFormat| {
            format_unix_in(secs, format, &tz).unwrap_or_else(|| MISSING_LABEL.to_string())
        };

        // Wind comes back in whatever system the weather was requested in.
        let wind_unit = record.temperature.unit.wind_speed_label();

        Self {
            location_label: record.location_label(),
            temperature_label: record.temperature.to(display_unit).to_string(),
            description: record.description(),
            icon_class: resolve_icon(record.condition_code, record.icon_day_flag),
            current_time_label: label(now.timestamp(), TimeFormat::Time),
            date_label: label(now.timestamp(), TimeFormat::Date),
            sunrise_label: label(record.sunrise_unix, TimeFormat::Time),
            sunset_label: label(record.sunset_unix, TimeFormat::Time),
            humidity_label: format!("{}%", record.humidity_percent),
            wind_label: format!("{} {}", record.wind_speed, wind_unit),
        }
    }
}

/// Background decision running alongside the rest of the presentation.
#[derive(Debug)]
pub struct BackgroundTask {
    handle: JoinHandle<BackgroundDirective>,
    fallback: BackgroundDirective,
}

impl BackgroundTask {
    /// Waits for the probes to settle. Always yields a directive.
    pub async fn resolve(self) -> BackgroundDirective {
        match self.handle.await {
            Ok(directive) => directive,
            Err(e) => {
                tracing::warn!(error = %e, "background task failed, using fallback color");
                self.fallback
            }
        }
    }
}

/// Values produced by one pipeline run.
#[derive(Debug)]
pub struct Session {
    pub location: LocationInfo,
    pub record: WeatherRecord,
    pub presentation: Presentation,
    pub background: BackgroundTask,
}

#[derive(Debug, Clone)]
pub struct PresentationPipeline {
    locator: Arc<dyn LocationProvider>,
    source: Arc<dyn WeatherSource>,
    probe: Arc<dyn AssetProbe>,
    policy: Arc<BackgroundPolicy>,
    request_unit: TemperatureUnit,
    display_unit: TemperatureUnit,
}

impl PresentationPipeline {
    pub fn new(
        locator: Arc<dyn LocationProvider>,
        source: Arc<dyn WeatherSource>,
        probe: Arc<dyn AssetProbe>,
        policy: BackgroundPolicy,
    ) -> Self {
        Self {
            locator,
            source,
            probe,
            policy: Arc::new(policy),
            request_unit: TemperatureUnit::default(),
            display_unit: TemperatureUnit::default(),
        }
    }

    pub fn with_units(mut self, request: TemperatureUnit, display: TemperatureUnit) -> Self {
        self.request_unit = request;
        self.display_unit = display;
        self
    }

    /// Wires the HTTP collaborators described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = http_client()?;
        let source = weather_source_from_config(config, http.clone())?;

        let pipeline = Self::new(
            Arc::new(IpInfoLocator::new(config.location_url.clone(), http.clone())),
            Arc::from(source),
            Arc::new(HttpAssetProbe::new(http)),
            config.background_policy(),
        )
        .with_units(config.units, config.display_unit());

        Ok(pipeline)
    }

    /// Runs the pipeline once. Must be called from within a tokio runtime.
    pub async fn run<Tz>(&self, now: &DateTime<Tz>) -> Result<Session, PipelineError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let location = self.locator.locate().await?;
        tracing::info!(city = %location.city, country = %location.country, "location resolved");

        let raw = self.source.current(&location, self.request_unit).await?;
        let record = normalize(&raw, self.request_unit)?;
        tracing::info!(
            code = record.condition_code,
            temperature = %record.temperature,
            "weather normalized"
        );

        let background = self.spawn_background(now, &record);
        let presentation = Presentation::derive(&record, now, self.display_unit);

        Ok(Session {
            location,
            record,
            presentation,
            background,
        })
    }

    fn spawn_background<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        record: &WeatherRecord,
    ) -> BackgroundTask {
        let now_ms = now.timestamp_millis();
        let hour = now.hour();
        let (sunrise, sunset) = (record.sunrise_unix, record.sunset_unix);
        let probe = Arc::clone(&self.probe);
        let policy = Arc::clone(&self.policy);

        let handle = tokio::spawn(async move {
            policy
                .select_at(probe.as_ref(), now_ms, hour, sunrise, sunset)
                .await
        });

        BackgroundTask {
            handle,
            fallback: self.policy.fallback(hour),
        }
    }
}
