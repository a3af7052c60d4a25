//! Core library for `weatherpane`.
//!
//! This crate defines:
//! - Normalization of OpenWeather payloads into a canonical record
//! - Derived presentation values (icons, time labels, units, background)
//! - The location, weather and asset collaborators behind traits
//! - Configuration handling
//!
//! Rendering is left to the caller; `weatherpane-cli` is one such view.

pub mod background;
pub mod config;
pub mod error;
pub mod icon;
pub mod location;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod provider;
pub mod time_format;
pub mod units;
pub mod view;

pub use background::{AssetProbe, BackgroundDirective, BackgroundPolicy};
pub use config::Config;
pub use error::{NormalizeError, PipelineError};
pub use location::LocationProvider;
pub use model::{LocationInfo, RawWeatherResponse, WeatherRecord};
pub use pipeline::{BackgroundTask, Presentation, PresentationPipeline, Session};
pub use provider::WeatherSource;
pub use units::{Temperature, TemperatureUnit};
pub use view::{MissingTarget, ViewSink, ViewTarget};
