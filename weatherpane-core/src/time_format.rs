//! Human-readable labels for Unix timestamps.
//!
//! All labels use fixed English formats. Inputs are whole seconds since the epoch;
//! callers holding milliseconds divide before calling.

use chrono::{DateTime, TimeZone};
use std::{convert::TryFrom, fmt::Display};

const TIME_FORMAT: &str = "%-I:%M %p";
const DATE_FORMAT: &str = "%A, %-d %b %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `3:07 PM`
    Time,
    /// `Monday, 5 Feb 2024`
    Date,
    /// `Monday, 5 Feb 2024 3:07 PM`
    DateTime,
}

impl TryFrom<&str> for TimeFormat {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "time" => Ok(TimeFormat::Time),
            "date" => Ok(TimeFormat::Date),
            "datetime" => Ok(TimeFormat::DateTime),
            _ => Err(anyhow::anyhow!(
                "Unknown time format '{value}'. Supported formats: time, date, datetime."
            )),
        }
    }
}

/// Formats `unix_seconds` in `tz`. Returns `None` for out-of-range timestamps.
pub fn format_unix_in<Tz>(unix_seconds: i64, format: TimeFormat, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let utc = DateTime::from_timestamp(unix_seconds, 0)?;
    let local = utc.with_timezone(tz);

    let label = match format {
        TimeFormat::Time => local.format(TIME_FORMAT).to_string(),
        TimeFormat::Date => local.format(DATE_FORMAT).to_string(),
        TimeFormat::DateTime => {
            format!("{} {}", local.format(DATE_FORMAT), local.format(TIME_FORMAT))
        }
    };

    Some(label)
}
