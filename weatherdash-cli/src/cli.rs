use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use std::{path::PathBuf, sync::Arc};
use weatherdash_core::{
    ApiKey, Config, Dashboard, ForecastStrategy, OpenWeatherProvider, SearchController,
    SearchState, Unit,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard for your terminal")]
pub struct Cli {
    /// Read configuration from this file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// OpenWeather API key to use for this run, overriding the configured one.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and display defaults.
    Configure,

    /// Show current weather and a 5-day forecast for a city.
    Show {
        /// City name, e.g. "Paris".
        city: String,

        #[arg(long, value_enum)]
        unit: Option<UnitArg>,

        #[arg(long, value_enum)]
        forecast: Option<ForecastArg>,

        /// Print the dashboard view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactive dashboard: search cities and switch units.
    Dashboard {
        #[arg(long, value_enum)]
        unit: Option<UnitArg>,

        #[arg(long, value_enum)]
        forecast: Option<ForecastArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    Celsius,
    Fahrenheit,
}

impl From<UnitArg> for Unit {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::Celsius => Unit::Celsius,
            UnitArg::Fahrenheit => Unit::Fahrenheit,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ForecastArg {
    Stride,
    CalendarDay,
}

impl From<ForecastArg> for ForecastStrategy {
    fn from(value: ForecastArg) -> Self {
        match value {
            ForecastArg::Stride => ForecastStrategy::Stride,
            ForecastArg::CalendarDay => ForecastStrategy::CalendarDay,
        }
    }
}

const DASHBOARD_HELP: &str = ":c celsius, :f fahrenheit, :u toggle, :q quit";

impl Cli {
    pub async fn run(self) -> Result<()> {
        let Cli {
            config: config_path,
            api_key,
            command,
            ..
        } = self;

        tracing::debug!(path = ?config_path, "Loading configuration");
        let config = match &config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match command {
            Command::Configure => configure(config, config_path),
            Command::Show {
                city,
                unit,
                forecast,
                json,
            } => {
                let ctl = controller(&config, api_key, unit, forecast)?;
                ctl.submit(&city).await;
                let view = ctl.view();

                if json {
                    let out = serde_json::to_string_pretty(&view)
                        .context("Failed to serialize dashboard view")?;
                    println!("{out}");
                } else if view.error.is_none() {
                    print!("{}", render::dashboard(&view)?);
                }

                if let SearchState::Failure(message) = ctl.state() {
                    bail!(message);
                }
                Ok(())
            }
            Command::Dashboard { unit, forecast } => {
                let ctl = controller(&config, api_key, unit, forecast)?;
                interactive(&ctl).await
            }
        }
    }
}

fn controller(
    config: &Config,
    api_key: Option<String>,
    unit: Option<UnitArg>,
    forecast: Option<ForecastArg>,
) -> Result<SearchController> {
    let api_key = match api_key {
        Some(key) => ApiKey::new(key),
        None => config.api_key()?,
    };
    let provider = OpenWeatherProvider::from_config(config, api_key)?;

    let dashboard = Dashboard::new(
        unit.map(Unit::from).unwrap_or(config.display.unit),
        forecast
            .map(ForecastStrategy::from)
            .unwrap_or(config.display.forecast),
    );

    Ok(SearchController::new(Arc::new(provider), dashboard))
}

fn configure(mut config: Config, path: Option<PathBuf>) -> Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let unit = Select::new("Default temperature unit:", vec![Unit::Celsius, Unit::Fahrenheit])
        .with_starting_cursor(match config.display.unit {
            Unit::Celsius => 0,
            Unit::Fahrenheit => 1,
        })
        .prompt()
        .context("Failed to read unit")?;
    config.display.unit = unit;

    let path = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn interactive(ctl: &SearchController) -> Result<()> {
    println!("{}", render::dashboard(&ctl.view())?);

    loop {
        let initial = ctl.input();
        let line = match Text::new("City:")
            .with_initial_value(&initial)
            .with_help_message(DASHBOARD_HELP)
            .prompt()
        {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        match line.trim() {
            ":q" | ":quit" => break,
            ":c" => ctl.set_unit(Unit::Celsius),
            ":f" => ctl.set_unit(Unit::Fahrenheit),
            ":u" => {
                ctl.toggle_unit();
            }
            _ => {
                ctl.set_input(&line);
                println!("Loading...");
                ctl.submit_input().await;
            }
        }

        println!("{}", render::dashboard(&ctl.view())?);
    }

    Ok(())
}
