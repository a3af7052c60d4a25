use anyhow::Context;
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use weatherpane_core::{
    Config, PresentationPipeline, TemperatureUnit, ViewTarget,
    view::{bind_background, bind_presentation},
};

use crate::view::TextView;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherpane", version, about = "Current weather for wherever you are")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the API key, units and background images.
    Configure,

    /// Look up your location and show its current weather.
    Show {
        /// Temperature unit: "c"/"celsius" or "f"/"fahrenheit".
        #[arg(long)]
        units: Option<String>,

        /// Print a JSON document instead of text.
        #[arg(long)]
        json: bool,

        /// Comma-separated targets to show, e.g. "location,temperature,wind".
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
    },

    /// Print the path of the configuration file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { units, json, fields } => show(units, json, fields).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn show(
    units: Option<String>,
    json: bool,
    fields: Option<Vec<String>>,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(units) = units {
        config.units = TemperatureUnit::try_from(units.as_str())?;
        config.display_units = None;
    }

    let pipeline = PresentationPipeline::from_config(&config)?;
    let session = pipeline.run(&Local::now()).await?;

    if json {
        let background = session.background.resolve().await;
        let doc = serde_json::json!({
            "presentation": session.presentation,
            "record": session.record,
            "background": background,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let layout = match fields {
        Some(names) => names
            .iter()
            .map(|n| ViewTarget::try_from(n.trim()))
            .collect::<anyhow::Result<Vec<_>>>()?,
        None => ViewTarget::all().to_vec(),
    };

    let mut view = TextView::new(layout);
    bind_presentation(&session.presentation, &mut view);
    view.flush()?;

    // Foreground is already on screen; the background arrives when the probes settle.
    let background = session.background.resolve().await;
    bind_background(&background, &mut view);
    view.flush()?;

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    // Read the file directly so an API key from the environment is not persisted.
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;
    println!("Configuring weatherpane ({})", path.display());

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let current = config.units;
    let start = TemperatureUnit::all()
        .iter()
        .position(|u| *u == current)
        .unwrap_or_default();
    config.units = Select::new("Temperature unit:", TemperatureUnit::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read temperature unit")?;
    config.display_units = None;

    config.background.day_image = Text::new("Daytime background image URL:")
        .with_default(&config.background.day_image)
        .prompt()
        .context("Failed to read day image URL")?;
    config.background.night_image = Text::new("Night background image URL:")
        .with_default(&config.background.night_image)
        .prompt()
        .context("Failed to read night image URL")?;

    config.save()?;
    println!("Saved. Run `weatherpane show` to see the weather.");

    Ok(())
}
