//! Configuration parsing from CLI arguments

use crate::{cli::Cli, error::Result, models::Config};

/// Turns parsed arguments into a validated run configuration
///
/// Environment fallbacks (`THOR_HAMMERS` and friends) are already resolved by
/// clap, so arguments beat environment which beats the built-in defaults.
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build and validate the configuration
    pub fn parse(&self) -> Result<Config> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }

    fn build(&self) -> Config {
        Config {
            url: self.cli.url.trim().to_string(),
            hammers: self.cli.hammers,
            throws: self.cli.throws,
            verbose: self.cli.verbose,
            timeout_seconds: self.cli.timeout,
            enable_color: self.cli.use_colors(),
            debug: self.cli.debug,
        }
    }
}

/// Load a validated configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("URL: {}", config.url));
    summary.push(format!("Hammers: {}", config.hammers));
    summary.push(format!("Throws per hammer: {}", config.throws));
    summary.push(format!("Total requests: {}", config.total_throws()));
    match config.timeout_seconds {
        Some(secs) => summary.push(format!("Timeout: {}s", secs)),
        None => summary.push("Timeout: none".to_string()),
    }
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
