//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// EcoTrip - sustainable multi-city trip planning
#[derive(Parser)]
#[command(
    name = "et",
    about = "Plan multi-city trips with low-carbon transport recommendations",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a single message to the assistant and print the reply (batch mode)
    Ask {
        /// The message to send
        message: String,
    },

    /// Print the effective configuration
    Config,
}

/// Path of the log file the TUI writes to
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ecotrip")
        .join("logs")
        .join("ecotrip.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_subcommand() {
        let cli = Cli::parse_from(["et", "ask", "Plan a trip to Denver"]);
        match cli.command {
            Some(Command::Ask { message }) => assert_eq!(message, "Plan a trip to Denver"),
            _ => panic!("expected Ask command"),
        }
    }

    #[test]
    fn test_no_subcommand_launches_tui() {
        let cli = Cli::parse_from(["et"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["et", "-l", "DEBUG", "--config", "/tmp/et.yml", "config"]);
        assert_eq!(cli.log_level.as_deref(), Some("DEBUG"));
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/et.yml")));
    }
}
