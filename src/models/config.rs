//! Run configuration data model and validation

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on concurrent hammers
pub const MAX_HAMMERS: u32 = 10_000;

/// Upper bound on throws per hammer
pub const MAX_THROWS: u32 = 1_000_000;

/// Upper bound on the optional request timeout
pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

/// Immutable configuration of a single load-generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Target URL hammered by every worker
    pub url: String,

    /// Number of concurrent hammers
    #[serde(default = "default_hammers")]
    pub hammers: u32,

    /// Number of sequential throws per hammer
    #[serde(default = "default_throws")]
    pub throws: u32,

    /// Print every response body
    #[serde(default)]
    pub verbose: bool,

    /// Per-request timeout; `None` waits forever
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Enable colored diagnostics on stderr
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            hammers: default_hammers(),
            throws: default_throws(),
            verbose: false,
            timeout_seconds: None,
            enable_color: default_enable_color(),
            debug: false,
        }
    }
}

impl Config {
    /// Create a configuration for `url` with default counts
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the number of hammers
    pub fn with_hammers(mut self, hammers: u32) -> Self {
        self.hammers = hammers;
        self
    }

    /// Set the number of throws per hammer
    pub fn with_throws(mut self, throws: u32) -> Self {
        self.throws = throws;
        self
    }

    /// Enable or disable response body printing
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Total number of requests the run will issue
    pub fn total_throws(&self) -> u64 {
        u64::from(self.hammers) * u64::from(self.throws)
    }

    /// Validate the configuration and return the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(AppError::config("URL cannot be empty"));
        }

        match url::Url::parse(&self.url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "URL must use http or https, got '{}': {}",
                        parsed.scheme(),
                        self.url
                    )));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!("Invalid URL '{}': {}", self.url, e)));
            }
        }

        if self.hammers == 0 {
            return Err(AppError::config("HAMMERS must be at least 1"));
        }

        if self.hammers > MAX_HAMMERS {
            return Err(AppError::config(format!("HAMMERS cannot exceed {}", MAX_HAMMERS)));
        }

        if self.throws == 0 {
            return Err(AppError::config("THROWS must be at least 1"));
        }

        if self.throws > MAX_THROWS {
            return Err(AppError::config(format!("THROWS cannot exceed {}", MAX_THROWS)));
        }

        if let Some(timeout) = self.timeout_seconds {
            if timeout == 0 {
                return Err(AppError::config("Timeout must be greater than 0"));
            }
            if timeout > MAX_TIMEOUT_SECONDS {
                return Err(AppError::config(format!(
                    "Timeout cannot exceed {} seconds",
                    MAX_TIMEOUT_SECONDS
                )));
            }
        }

        Ok(())
    }
}

fn default_hammers() -> u32 {
    crate::defaults::DEFAULT_HAMMERS
}

fn default_throws() -> u32 {
    crate::defaults::DEFAULT_THROWS
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
