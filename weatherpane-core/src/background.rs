//! Day/night background selection.
//!
//! Sunrise and sunset decide which image is wanted. If that image cannot be
//! reached, the background falls back to a solid color picked by wall-clock hour.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Timelike};
use reqwest::{Client, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::{fmt, fmt::Debug, time::Duration};

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPhase {
    Day,
    Night,
}

impl DayPhase {
    /// Day when `sunrise <= now < sunset`. Sunrise and sunset are in seconds, `now` in ms.
    pub fn classify(now_ms: i64, sunrise_unix: i64, sunset_unix: i64) -> Self {
        let sunrise_ms = sunrise_unix.saturating_mul(1000);
        let sunset_ms = sunset_unix.saturating_mul(1000);

        if (sunrise_ms..sunset_ms).contains(&now_ms) {
            DayPhase::Day
        } else {
            DayPhase::Night
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteBand {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl PaletteBand {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => PaletteBand::Morning,
            12..=17 => PaletteBand::Afternoon,
            18..=20 => PaletteBand::Evening,
            _ => PaletteBand::Night,
        }
    }
}

/// Solid colors used when no background image is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub morning: String,
    pub afternoon: String,
    pub evening: String,
    pub night: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            morning: "#FFD700".to_string(),
            afternoon: "#87CEEB".to_string(),
            evening: "#FF4500".to_string(),
            night: "#191970".to_string(),
        }
    }
}

impl Palette {
    pub fn color(&self, band: PaletteBand) -> &str {
        match band {
            PaletteBand::Morning => &self.morning,
            PaletteBand::Afternoon => &self.afternoon,
            PaletteBand::Evening => &self.evening,
            PaletteBand::Night => &self.night,
        }
    }

    pub fn color_for_hour(&self, hour: u32) -> &str {
        self.color(PaletteBand::from_hour(hour))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundAssets {
    pub day_image: String,
    pub night_image: String,
}

impl BackgroundAssets {
    pub fn for_phase(&self, phase: DayPhase) -> &str {
        match phase {
            DayPhase::Day => &self.day_image,
            DayPhase::Night => &self.night_image,
        }
    }
}

/// What the view should paint behind the weather.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum BackgroundDirective {
    Image(String),
    Color(String),
}

impl fmt::Display for BackgroundDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundDirective::Image(url) => write!(f, "url('{url}')"),
            BackgroundDirective::Color(color) => f.write_str(color),
        }
    }
}

/// Checks whether an image asset can be loaded.
#[async_trait]
pub trait AssetProbe: Send + Sync + Debug {
    async fn exists(&self, url: &str) -> bool;
}

/// Probes assets with a GET request.
#[derive(Debug, Clone, Default)]
pub struct HttpAssetProbe {
    http: Client,
}

impl HttpAssetProbe {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AssetProbe for HttpAssetProbe {
    async fn exists(&self, url: &str) -> bool {
        let res = match self.http.get(url).send().await {
            Ok(res) => res,
            Err(e) => {
                tracing::debug!(url, error = %e, "background asset unreachable");
                return false;
            }
        };

        if !res.status().is_success() {
            tracing::debug!(url, status = %res.status(), "background asset unavailable");
            return false;
        }

        // A missing content type is accepted.
        match res.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
            Some(content_type) => content_type.starts_with("image/"),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundPolicy {
    pub assets: BackgroundAssets,
    pub palette: Palette,
    pub probe_timeout: Duration,
}

impl BackgroundPolicy {
    pub fn new(assets: BackgroundAssets, palette: Palette) -> Self {
        Self {
            assets,
            palette,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Fallback color for the given wall-clock hour.
    pub fn fallback(&self, hour: u32) -> BackgroundDirective {
        BackgroundDirective::Color(self.palette.color_for_hour(hour).to_string())
    }

    /// Chooses the background for `now`, using its time zone for the palette hour.
    pub async fn select<Tz, P>(
        &self,
        probe: &P,
        now: &DateTime<Tz>,
        sunrise_unix: i64,
        sunset_unix: i64,
    ) -> BackgroundDirective
    where
        Tz: TimeZone,
        P: AssetProbe + ?Sized,
    {
        self.select_at(probe, now.timestamp_millis(), now.hour(), sunrise_unix, sunset_unix)
            .await
    }

    /// Same as [`select`](Self::select) with the instant already split into
    /// epoch milliseconds and local hour.
    pub async fn select_at<P>(
        &self,
        probe: &P,
        now_ms: i64,
        local_hour: u32,
        sunrise_unix: i64,
        sunset_unix: i64,
    ) -> BackgroundDirective
    where
        P: AssetProbe + ?Sized,
    {
        // Both are probed up front; which one is needed depends on the phase.
        let (day_ok, night_ok) = tokio::join!(
            self.probe(probe, &self.assets.day_image),
            self.probe(probe, &self.assets.night_image),
        );

        let phase = DayPhase::classify(now_ms, sunrise_unix, sunset_unix);
        let available = match phase {
            DayPhase::Day => day_ok,
            DayPhase::Night => night_ok,
        };

        let directive = if available {
            BackgroundDirective::Image(self.assets.for_phase(phase).to_string())
        } else {
            self.fallback(local_hour)
        };

        tracing::debug!(?phase, %directive, "background selected");
        directive
    }

    async fn probe<P>(&self, probe: &P, url: &str) -> bool
    where
        P: AssetProbe + ?Sized,
    {
        match tokio::time::timeout(self.probe_timeout, probe.exists(url)).await {
            Ok(found) => found,
            Err(_) => {
                tracing::warn!(url, timeout = ?self.probe_timeout, "background probe timed out");
                false
            }
        }
    }
}
