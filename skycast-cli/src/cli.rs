use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};

use skycast_core::provider::weatherapi::client_from_config;
use skycast_core::{
    Config, DEFAULT_FORECAST_DAYS, FetchController, SuggestionController, WeatherSnapshot,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather forecasts in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store your WeatherAPI.com key and a default location.
    Configure,

    /// Show current conditions, the next hours and the multi-day forecast.
    Show {
        /// Location name; falls back to the configured default.
        location: Option<String>,

        /// Forecast days to request.
        #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
        days: u8,
    },

    /// Search for locations the way the app's search box would.
    Search {
        /// Query text; needs at least 2 characters to hit the network.
        query: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, days } => show(location, days).await,
            Command::Search { query } => search(&query).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    let key = inquire::Password::new("WeatherAPI.com key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let location = inquire::Text::new("Default location:")
        .with_default(cfg.default_location())
        .prompt()
        .context("Failed to read default location")?;

    cfg.api_key = Some(key);
    cfg.default_location = Some(location);
    cfg.save()?;

    println!("Saved config to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(location: Option<String>, days: u8) -> Result<()> {
    let cfg = Config::load()?;
    let client = client_from_config(&cfg)?;

    let query = location.unwrap_or_else(|| cfg.default_location().to_string());
    tracing::debug!(%query, days, "fetching forecast");

    let mut controller = FetchController::new(cfg.default_location());
    controller.run(&client, &query, days).await;

    if let Some(err) = &controller.state().error {
        bail!("{err}");
    }
    let snapshot = controller.snapshot().context("Fetch finished without a snapshot")?;

    render(controller.location_label(), snapshot);
    Ok(())
}

async fn search(query: &str) -> Result<()> {
    let cfg = Config::load()?;
    let client = client_from_config(&cfg)?;

    let mut controller = SuggestionController::new();
    controller.drive(&client, query).await;

    if controller.suggestions().is_empty() {
        println!("No matches for '{query}'.");
        return Ok(());
    }

    for (index, location) in controller.suggestions().iter().enumerate() {
        println!("{}. {}", index + 1, location.display_name());
    }

    if let Some(resolved) = controller.submit(None) {
        println!("\nSubmitting this search would fetch: {resolved}");
    }

    Ok(())
}

fn render(location: &str, snapshot: &WeatherSnapshot) {
    println!("{location} — {}", Local::now().format("%A, %B %-d"));
    println!();
    println!("  {}°F, {}", snapshot.temperature, snapshot.condition);
    println!("  Feels like {}°F", snapshot.feels_like);
    println!();
    println!("  Humidity   {:>5}%", snapshot.humidity);
    println!("  Wind       {:>5} mph", snapshot.wind_speed);
    println!("  Visibility {:>5} mi", snapshot.visibility);
    println!("  Pressure   {:>5} in", snapshot.pressure);
    println!("  UV index   {:>5}", snapshot.uv_index);

    if !snapshot.hourly.is_empty() {
        println!();
        println!("Next hours:");
        for hour in &snapshot.hourly {
            println!("  {:>5}  {:>3}°F  {}", hour.time, hour.temp, hour.condition);
        }
    }

    if !snapshot.forecast.is_empty() {
        println!();
        println!("{}-day forecast:", snapshot.forecast.len());
        for (index, day) in snapshot.forecast.iter().enumerate() {
            let label = if index == 0 { "Today" } else { day.day.as_str() };
            println!("  {label:<5}  {:>3}° / {:>3}°  {}", day.high, day.low, day.condition);
        }
    }
}
