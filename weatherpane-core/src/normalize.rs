//! Validation of raw provider payloads into [`WeatherRecord`]s.

use chrono::DateTime;

use crate::{
    error::NormalizeError,
    model::{RawWeatherResponse, WeatherRecord},
    units::{Temperature, TemperatureUnit, ceil_degrees},
};

fn require<'a, T>(value: &'a Option<T>, field: &str) -> Result<&'a T, NormalizeError> {
    value
        .as_ref()
        .ok_or_else(|| NormalizeError::MissingField(field.to_string()))
}

/// Parses an OpenWeather body and normalizes it in one step.
pub fn parse_and_normalize(
    body: &str,
    unit: TemperatureUnit,
) -> Result<WeatherRecord, NormalizeError> {
    let raw: RawWeatherResponse = serde_json::from_str(body)?;
    normalize(&raw, unit)
}

/// Builds a [`WeatherRecord`] from `raw`, which was requested in `unit`.
///
/// Any missing field invalidates the whole response. Temperature is rounded up.
/// Every `weather[i]` must carry a description, not just the first entry.
pub fn normalize(
    raw: &RawWeatherResponse,
    unit: TemperatureUnit,
) -> Result<WeatherRecord, NormalizeError> {
    let city = require(&raw.name, "name")?;
    let sys = require(&raw.sys, "sys")?;
    let country = require(&sys.country, "sys.country")?;
    let sunrise = *require(&sys.sunrise, "sys.sunrise")?;
    let sunset = *require(&sys.sunset, "sys.sunset")?;
    let main = require(&raw.main, "main")?;
    let temp = *require(&main.temp, "main.temp")?;
    let humidity = *require(&main.humidity, "main.humidity")?;
    let wind = require(&raw.wind, "wind")?;
    let wind_speed = *require(&wind.speed, "wind.speed")?;

    let conditions = match raw.weather.as_deref() {
        Some(conditions) if !conditions.is_empty() => conditions,
        _ => return Err(NormalizeError::EmptyConditions),
    };

    let primary = &conditions[0];
    let condition_code = *require(&primary.id, "weather[0].id")?;
    let icon = require(&primary.icon, "weather[0].icon")?;

    let descriptions = conditions
        .iter()
        .enumerate()
        .map(|(i, c)| {
            c.description
                .clone()
                .ok_or_else(|| NormalizeError::MissingField(format!("weather[{i}].description")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !temp.is_finite() {
        return Err(NormalizeError::InvalidValue {
            field: "main.temp",
            reason: format!("{temp} is not a finite number"),
        });
    }

    for (field, ts) in [("sys.sunrise", sunrise), ("sys.sunset", sunset)] {
        if DateTime::from_timestamp(ts, 0).is_none() {
            return Err(NormalizeError::InvalidValue {
                field,
                reason: format!("{ts} is outside the representable time range"),
            });
        }
    }

    if sunrise >= sunset {
        return Err(NormalizeError::InvalidValue {
            field: "sys.sunrise",
            reason: format!("sunrise {sunrise} is not before sunset {sunset}"),
        });
    }

    Ok(WeatherRecord {
        city: city.clone(),
        country: country.clone(),
        descriptions,
        temperature: Temperature::new(ceil_degrees(temp), unit),
        sunrise_unix: sunrise,
        sunset_unix: sunset,
        humidity_percent: humidity,
        wind_speed,
        condition_code,
        icon_day_flag: icon.ends_with('d'),
    })
}
