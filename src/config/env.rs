//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::logging::{LOG_FORMAT_ENV, LOG_LEVEL_ENV};
use crate::models::config::{MAX_HAMMERS, MAX_THROWS, MAX_TIMEOUT_SECONDS};
use std::path::Path;

pub const HAMMERS_ENV: &str = "THOR_HAMMERS";
pub const THROWS_ENV: &str = "THOR_THROWS";
pub const TIMEOUT_ENV: &str = "THOR_TIMEOUT";

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the working directory if it exists
    ///
    /// Returns whether a file was loaded. Variables already set in the
    /// process environment win over the file.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"))
    }

    /// Load a specific env file if it exists
    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;
        Ok(true)
    }

    /// Validate a single variable's value
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            HAMMERS_ENV => {
                let hammers: u32 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if hammers == 0 || hammers > MAX_HAMMERS {
                    return Err(AppError::config(format!(
                        "{} must be between 1 and {}, got: {}",
                        key, MAX_HAMMERS, hammers
                    )));
                }
            }
            THROWS_ENV => {
                let throws: u32 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if throws == 0 || throws > MAX_THROWS {
                    return Err(AppError::config(format!(
                        "{} must be between 1 and {}, got: {}",
                        key, MAX_THROWS, throws
                    )));
                }
            }
            TIMEOUT_ENV => {
                let timeout: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if timeout == 0 || timeout > MAX_TIMEOUT_SECONDS {
                    return Err(AppError::config(format!(
                        "{} must be between 1 and {}, got: {}",
                        key, MAX_TIMEOUT_SECONDS, timeout
                    )));
                }
            }
            LOG_LEVEL_ENV => {
                value.parse::<crate::logging::LogLevel>()?;
            }
            LOG_FORMAT_ENV => {
                value.parse::<crate::logging::LogFormat>()?;
            }
            _ => {}
        }

        Ok(())
    }

    /// All supported environment variables with descriptions and examples
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (HAMMERS_ENV, "Default number of hammers", "4"),
            (THROWS_ENV, "Default number of throws per hammer", "10"),
            (TIMEOUT_ENV, "Default per-request timeout in seconds", "30"),
            (LOG_LEVEL_ENV, "Log level (trace, debug, info, warn, error)", "info"),
            (LOG_FORMAT_ENV, "Log format (console, json, compact)", "json"),
        ]
    }

    /// Validate all currently set supported variables, collecting warnings
    pub fn validate_current_env() -> Vec<String> {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(format!("Warning: {}", e));
                }
            }
        }

        warnings
    }
}
