use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    background::{BackgroundAssets, BackgroundPolicy, DEFAULT_PROBE_TIMEOUT, Palette},
    location::DEFAULT_LOCATION_URL,
    provider::openweather::DEFAULT_WEATHER_URL,
    units::TemperatureUnit,
};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WEATHERPANE_API_KEY";

/// Background image settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub day_image: String,
    pub night_image: String,
    pub probe_timeout_ms: u64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            day_image: "http://localhost/img/day.jpg".to_string(),
            night_image: "http://localhost/img/night.jpg".to_string(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT.as_millis() as u64,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "celsius"
///
/// [background]
/// day_image = "https://example.com/day.jpg"
///
/// [palette]
/// night = "#000033"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Units the weather is requested in.
    pub units: TemperatureUnit,

    /// Units temperatures are shown in; defaults to `units`.
    pub display_units: Option<TemperatureUnit>,

    pub location_url: String,
    pub weather_url: String,
    pub background: BackgroundConfig,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            units: TemperatureUnit::default(),
            display_units: None,
            location_url: DEFAULT_LOCATION_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            background: BackgroundConfig::default(),
            palette: Palette::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env_override(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherpane", "weatherpane")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn apply_env_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Returns the API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
    }

    pub fn display_unit(&self) -> TemperatureUnit {
        self.display_units.unwrap_or(self.units)
    }

    pub fn background_policy(&self) -> BackgroundPolicy {
        BackgroundPolicy::new(
            BackgroundAssets {
                day_image: self.background.day_image.clone(),
                night_image: self.background.night_image.clone(),
            },
            self.palette.clone(),
        )
        .with_probe_timeout(Duration::from_millis(self.background.probe_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_endpoints_and_palette() {
        let cfg = Config::default();

        assert_eq!(cfg.units, TemperatureUnit::Fahrenheit);
        assert_eq!(cfg.display_unit(), TemperatureUnit::Fahrenheit);
        assert_eq!(cfg.location_url, "https://ipinfo.io/json");
        assert_eq!(cfg.palette.night, "#191970");
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r##"
            api_key = "OPEN_KEY"
            units = "celsius"

            [palette]
            night = "#000000"
            "##,
        )
        .expect("partial config must parse");

        assert_eq!(cfg.api_key().as_deref(), Some("OPEN_KEY"));
        assert_eq!(cfg.units, TemperatureUnit::Celsius);
        assert_eq!(cfg.display_unit(), TemperatureUnit::Celsius);
        assert_eq!(cfg.palette.night, "#000000");
        assert_eq!(cfg.palette.morning, "#FFD700");
        assert_eq!(cfg.background.probe_timeout_ms, 3000);
    }

    #[test]
    fn display_units_override_request_units() {
        let cfg = Config {
            units: TemperatureUnit::Celsius,
            display_units: Some(TemperatureUnit::Fahrenheit),
            ..Config::default()
        };
        assert_eq!(cfg.display_unit(), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn env_override_replaces_stored_key_unless_blank() {
        let mut cfg = Config {
            api_key: Some("FILE_KEY".into()),
            ..Config::default()
        };

        cfg.apply_env_override(Some("  ".into()));
        assert_eq!(cfg.api_key().as_deref(), Some("FILE_KEY"));

        cfg.apply_env_override(Some("ENV_KEY".into()));
        assert_eq!(cfg.api_key().as_deref(), Some("ENV_KEY"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = Config {
            api_key: Some("   ".into()),
            ..Config::default()
        };
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn background_policy_uses_configured_timeout() {
        let mut cfg = Config::default();
        cfg.background.probe_timeout_ms = 250;

        let policy = cfg.background_policy();
        assert_eq!(policy.probe_timeout, Duration::from_millis(250));
        assert_eq!(policy.assets.day_image, cfg.background.day_image);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("weatherpane-does-not-exist/config.toml");
        let cfg = Config::load_from(&path).expect("missing file is not an error");
        assert!(cfg.api_key.is_none());
    }
}
