//! EcoTrip - sustainable multi-city trip planning
//!
//! CLI entry point: launches the chat TUI by default, or runs one-shot
//! commands (`ask`, `config`).

use std::fs;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use ecotrip::cli::{Cli, Command, get_log_path};
use ecotrip::config::Config;
use ecotrip::domain::Itinerary;
use ecotrip::trip::{SelectionState, TripState, compute_totals, format_duration};
use ecotrip::{ChatClient, ConversationBridge, EmissionService, EmissionsClient};

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Note: can't log here since logging isn't initialized yet
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    let level = match cli_log_level.map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    // The terminal belongs to the TUI, so logs go to a file
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("EcoTrip loaded config: backend={}", config.backend.base_url);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Ask { message }) => cmd_ask(&config, &message).await,
        Some(Command::Config) => cmd_config(&config),
        None => cmd_tui(&config).await,
    }
}

/// Launch the chat TUI (default)
async fn cmd_tui(config: &Config) -> Result<()> {
    debug!("cmd_tui: called");
    let bridge: Arc<dyn ConversationBridge> = Arc::new(
        ChatClient::from_config(&config.backend, config.chat.history_window)
            .context("Failed to create backend client")?,
    );
    let emissions: Arc<dyn EmissionService> =
        Arc::new(EmissionsClient::from_config(&config.emissions).context("Failed to create emissions client")?);

    debug!("cmd_tui: launching TUI");
    ecotrip::tui::run(config, bridge, emissions).await
}

/// Send a single message to the assistant and print the reply
async fn cmd_ask(config: &Config, message: &str) -> Result<()> {
    debug!(message_len = message.len(), "cmd_ask: called");
    let bridge =
        ChatClient::from_config(&config.backend, config.chat.history_window).context("Failed to create backend client")?;

    let response = bridge.send(message, &Itinerary::default(), &[]).await?;
    println!("{}", response.response);

    let Some(payload) = response.itinerary else {
        debug!("cmd_ask: no itinerary this turn");
        return Ok(());
    };

    let mut trip = TripState::default();
    trip.apply_assistant_itinerary(payload);

    let mut selection = SelectionState::new();
    selection.ensure_seeded(&trip.itinerary.segments);

    println!();
    println!("{}", "Itinerary".bold());
    for destination in &trip.itinerary.destinations {
        println!("  {}. {}", destination.id, destination.name);
    }

    let totals = compute_totals(&trip.itinerary.segments, &selection);
    if totals.has_data {
        println!();
        println!("{}", "Eco-default transport per leg".bold());
        for choice in &totals.breakdown {
            println!(
                "  {} → {}  {}  {}  {} kg CO₂",
                choice.from,
                choice.to,
                choice.mode.label().green(),
                format_duration(choice.duration_hours),
                choice.carbon_kg
            );
        }
        println!();
        println!("  Travel time: {}", format_duration(totals.total_duration).yellow());
        println!("  Emissions:   {}", format!("{} kg CO₂", totals.total_emissions).green());
        println!("  Overall:     {}", trip.itinerary.transportation.label());
    }

    Ok(())
}

/// Print the effective configuration
fn cmd_config(config: &Config) -> Result<()> {
    debug!("cmd_config: called");
    print!("{}", serde_yaml::to_string(config)?);
    Ok(())
}
