//! Command-line interface definition

pub mod help;

pub use help::{usage_text, HelpSystem};

use crate::models::config::MAX_TIMEOUT_SECONDS;
use clap::{ArgAction, Parser};

/// Hammer a URL with concurrent workers and report the average latency
///
/// `-h` selects the number of hammers, so clap's short help flag is disabled
/// and help is only reachable through `--help`.
#[derive(Parser, Debug, Clone)]
#[command(name = "thor")]
#[command(version, about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Number of concurrent hammers
    #[arg(
        short = 'h',
        long = "hammers",
        value_name = "HAMMERS",
        env = "THOR_HAMMERS",
        default_value_t = crate::defaults::DEFAULT_HAMMERS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub hammers: u32,

    /// Number of sequential throws per hammer
    #[arg(
        short = 't',
        long = "throws",
        value_name = "THROWS",
        env = "THOR_THROWS",
        default_value_t = crate::defaults::DEFAULT_THROWS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub throws: u32,

    /// Print every response body
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS", env = "THOR_TIMEOUT", value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    /// Disable colored diagnostics
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub debug: bool,

    /// Print usage and exit
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,

    /// Target URL
    #[arg(value_name = "URL")]
    pub url: String,
}

impl Cli {
    /// Check if colors should be enabled for diagnostics
    pub fn use_colors(&self) -> bool {
        if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Parse a timeout in whole seconds
fn parse_timeout(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid timeout: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid timeout: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Timeout must be greater than 0".to_string())
            } else if secs > MAX_TIMEOUT_SECONDS {
                Err(format!("Timeout cannot exceed {} seconds", MAX_TIMEOUT_SECONDS))
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
