//! Binding presentation values to a view.
//!
//! A view that lacks a slot for some value is not an error worth aborting for:
//! the miss is logged and every other value is still bound.

use crate::{background::BackgroundDirective, pipeline::Presentation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewTarget {
    Location,
    Temperature,
    Description,
    Icon,
    CurrentTime,
    Date,
    Sunrise,
    Sunset,
    Humidity,
    Wind,
    Background,
}

impl ViewTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewTarget::Location => "location",
            ViewTarget::Temperature => "temperature",
            ViewTarget::Description => "description",
            ViewTarget::Icon => "icon",
            ViewTarget::CurrentTime => "current_time",
            ViewTarget::Date => "date",
            ViewTarget::Sunrise => "sunrise",
            ViewTarget::Sunset => "sunset",
            ViewTarget::Humidity => "humidity",
            ViewTarget::Wind => "wind",
            ViewTarget::Background => "background",
        }
    }

    pub const fn all() -> &'static [ViewTarget] {
        &[
            ViewTarget::Location,
            ViewTarget::Temperature,
            ViewTarget::Description,
            ViewTarget::Icon,
            ViewTarget::CurrentTime,
            ViewTarget::Date,
            ViewTarget::Sunrise,
            ViewTarget::Sunset,
            ViewTarget::Humidity,
            ViewTarget::Wind,
            ViewTarget::Background,
        ]
    }
}

impl std::fmt::Display for ViewTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ViewTarget {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ViewTarget::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| anyhow::anyhow!("Unknown view target '{value}'."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("View has no target for `{0}`")]
pub struct MissingTarget(pub ViewTarget);

/// Something that can display presentation values.
pub trait ViewSink {
    fn bind(&mut self, target: ViewTarget, value: &str) -> Result<(), MissingTarget>;
}

impl Presentation {
    /// Foreground values paired with their targets, in display order.
    pub fn values(&self) -> [(ViewTarget, &str); 10] {
        [
            (ViewTarget::Location, self.location_label.as_str()),
            (ViewTarget::Date, self.date_label.as_str()),
            (ViewTarget::CurrentTime, self.current_time_label.as_str()),
            (ViewTarget::Icon, self.icon_class.as_str()),
            (ViewTarget::Temperature, self.temperature_label.as_str()),
            (ViewTarget::Description, self.description.as_str()),
            (ViewTarget::Sunrise, self.sunrise_label.as_str()),
            (ViewTarget::Sunset, self.sunset_label.as_str()),
            (ViewTarget::Humidity, self.humidity_label.as_str()),
            (ViewTarget::Wind, self.wind_label.as_str()),
        ]
    }
}

/// Binds every foreground value. Returns the targets the sink did not have.
pub fn bind_presentation<S: ViewSink + ?Sized>(
    presentation: &Presentation,
    sink: &mut S,
) -> Vec<ViewTarget> {
    presentation
        .values()
        .into_iter()
        .filter_map(|(target, value)| bind_one(sink, target, value).err())
        .map(|MissingTarget(target)| target)
        .collect()
}

/// Binds the background once it has settled. Returns `false` if the sink has no slot for it.
pub fn bind_background<S: ViewSink + ?Sized>(
    directive: &BackgroundDirective,
    sink: &mut S,
) -> bool {
    bind_one(sink, ViewTarget::Background, &directive.to_string()).is_ok()
}

fn bind_one<S: ViewSink + ?Sized>(
    sink: &mut S,
    target: ViewTarget,
    value: &str,
) -> Result<(), MissingTarget> {
    sink.bind(target, value).inspect_err(|e| {
        tracing::warn!(view_target = %target, "{e}");
    })
}
