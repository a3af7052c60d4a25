use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Temperature scale used both for provider requests and for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    /// Value of the OpenWeather `units` query parameter.
    pub fn api_param(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "metric",
            TemperatureUnit::Fahrenheit => "imperial",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Wind speed unit the provider reports alongside this temperature unit.
    pub fn wind_speed_label(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "m/s",
            TemperatureUnit::Fahrenheit => "mph",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

/// Rounds up to a whole degree. Values in (-1, 0) become `0`, never `-0`.
pub fn ceil_degrees(value: f64) -> f64 {
    let v = value.ceil();
    if v == 0.0 { 0.0 } else { v }
}

/// Converts Celsius to Fahrenheit, rounding up to the next whole degree.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    ceil_degrees(celsius * 9.0 / 5.0 + 32.0)
}

/// Converts Fahrenheit to Celsius, rounding up to the next whole degree.
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    ceil_degrees((fahrenheit - 32.0) * 5.0 / 9.0)
}

/// A temperature value that always travels with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub value: f64,
    pub unit: TemperatureUnit,
}

impl Temperature {
    pub fn new(value: f64, unit: TemperatureUnit) -> Self {
        Self { value, unit }
    }

    /// Returns the temperature expressed in `unit`. Same-unit calls are the identity.
    pub fn to(self, unit: TemperatureUnit) -> Temperature {
        let value = match (self.unit, unit) {
            (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => {
                celsius_to_fahrenheit(self.value)
            }
            (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => {
                fahrenheit_to_celsius(self.value)
            }
            _ => self.value,
        };

        Temperature { value, unit }
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.unit.symbol())
    }
}
