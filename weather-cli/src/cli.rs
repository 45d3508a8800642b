use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::debug;
use weather_core::{Config, Renderer, SearchError, UiEvent, Units, WeatherApp};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and 24-hour forecast by city")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure {
        /// Key to store; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show current weather and the next 24 hours for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,

        /// Unit system to request: metric or standard.
        #[arg(long)]
        units: Option<Units>,

        /// Print the rendered view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities until Esc or Ctrl-C.
    Interactive {
        /// Unit system to request: metric or standard.
        #[arg(long)]
        units: Option<Units>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command.unwrap_or(Command::Interactive { units: None }) {
            Command::Configure { api_key } => configure(api_key),
            Command::Show { city, units, json } => {
                let config = load_config(units)?;
                show(&config, city, json).await
            }
            Command::Interactive { units } => {
                let config = load_config(units)?;
                interactive(&config).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn load_config(units: Option<Units>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(units) = units {
        config.units = units;
    }
    debug!(units = %config.units, api_base_url = %config.api_base_url, "config loaded");
    Ok(config)
}

fn configure(api_key: Option<String>) -> anyhow::Result<ExitCode> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeather API key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save_to(&path)?;

    println!("Saved API key to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

async fn show(config: &Config, city: String, json: bool) -> anyhow::Result<ExitCode> {
    let mut app = WeatherApp::from_config(config)?;
    let renderer = Renderer::from_config(config);

    app.dispatch(UiEvent::CityEdited(city))?;
    match app.dispatch(UiEvent::SearchClicked) {
        Ok(Some(pending)) => {
            let outcome = pending.run().await;
            app.complete(outcome);
        }
        Ok(None) => {}
        Err(SearchError::EmptyCity) => anyhow::bail!(SearchError::EmptyCity),
        // Already recorded in the view's error message.
        Err(_) => {}
    }

    let rendered = renderer.render(app.view(), &Local);
    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        print!("{rendered}");
    }

    if app.view().error_message().is_some() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let mut app = WeatherApp::from_config(config)?;
    let renderer = Renderer::from_config(config);

    println!("Simple Weather App");

    loop {
        let initial = app.view().city().to_string();
        let input = Text::new("City:")
            .with_placeholder("Enter city")
            .with_initial_value(&initial)
            .with_help_message("Enter to search, Esc to quit")
            .prompt();

        let city = match input {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        app.dispatch(UiEvent::CityEdited(city))?;
        match app.dispatch(UiEvent::EnterPressed) {
            Ok(Some(pending)) => {
                print!("{}", renderer.render(app.view(), &Local).weather);
                let outcome = pending.run().await;
                app.complete(outcome);
            }
            Ok(None) => {}
            Err(SearchError::EmptyCity) => {
                println!("{}", SearchError::EmptyCity);
                continue;
            }
            Err(_) => {}
        }

        println!("{}", renderer.render(app.view(), &Local));
    }

    Ok(())
}
