//! Structured logging for thor
//!
//! Entries always go to standard error, one line per entry under the stderr
//! lock. Standard output is reserved for the result report.

use crate::error::{AppError, Result};
use crate::models::{Config, ThrowMeasurement};
use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use uuid::Uuid;

/// Environment variable overriding the minimum level
pub const LOG_LEVEL_ENV: &str = "THOR_LOG_LEVEL";

/// Environment variable overriding the output format
pub const LOG_FORMAT_ENV: &str = "THOR_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn paint(&self, label: &str) -> ColoredString {
        match self {
            LogLevel::Trace => label.dimmed(),
            LogLevel::Debug => label.cyan(),
            LogLevel::Info => label.green(),
            LogLevel::Warn => label.yellow(),
            LogLevel::Error => label.red().bold(),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(AppError::parse(format!(
                "{} must be one of trace, debug, info, warn, error (got '{}')",
                LOG_LEVEL_ENV, other
            ))),
        }
    }
}

/// Line layout of log entries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Timestamp, level, component, message, fields
    Console,
    /// One JSON object per line
    Json,
    /// Time, level initial, component, message
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(AppError::parse(format!(
                "{} must be one of console, json, compact (got '{}')",
                LOG_FORMAT_ENV, other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Component that produced the entry
    pub component: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LogLocation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
    pub module: Option<String>,
}

/// Logger for one component of a run
#[derive(Debug, Clone)]
pub struct Logger {
    component: String,
    min_level: LogLevel,
    format: LogFormat,
    use_color: bool,
    include_location: bool,
    session: Option<String>,
}

impl Logger {
    /// Quiet logger: warnings and errors only, no session
    pub fn new(component: String) -> Self {
        Self {
            component,
            min_level: LogLevel::Warn,
            format: LogFormat::Console,
            use_color: true,
            include_location: false,
            session: None,
        }
    }

    /// Logger whose verbosity and colors follow the run configuration
    ///
    /// `--debug` lowers the threshold to Debug and adds source locations.
    pub fn with_config(component: String, config: &Config) -> Self {
        Self {
            min_level: if config.debug { LogLevel::Debug } else { LogLevel::Warn },
            use_color: config.enable_color,
            include_location: config.debug,
            ..Self::new(component)
        }
    }

    /// Apply `THOR_LOG_LEVEL` and `THOR_LOG_FORMAT` if set
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            self.min_level = level.parse()?;
        }
        if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
            self.format = format.parse()?;
        }
        Ok(())
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, LogLevel::Info, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, LogLevel::Error, message)
    }

    fn write(&self, entry: &LogEntry) {
        let line = self.render(entry);
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", line);
    }

    fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.render_console(entry),
            LogFormat::Json => serde_json::to_string(entry)
                .unwrap_or_else(|e| format!("{{\"message\":\"unserializable log entry: {}\"}}", e)),
            LogFormat::Compact => format!(
                "{} {} {}: {}",
                entry.timestamp.format("%H:%M:%S"),
                &entry.level.as_str()[..1],
                entry.component,
                entry.message
            ),
        }
    }

    fn render_console(&self, entry: &LogEntry) -> String {
        let label = format!("{:>5}", entry.level.as_str());
        let label = if self.use_color {
            entry.level.paint(&label).to_string()
        } else {
            label
        };

        let mut line = format!(
            "{} {} [{}] {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            label,
            entry.component,
            entry.message
        );

        if !entry.fields.is_empty() {
            let fields: Vec<String> = entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            line.push_str(&format!(" {{{}}}", fields.join(", ")));
        }
        if let Some(session) = &entry.session {
            line.push_str(&format!(" session={}", session));
        }
        if self.include_location {
            if let Some(location) = &entry.location {
                line.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        line
    }
}

/// Collects fields for one entry; nothing is written until [`log`](Self::log)
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: Option<LogEntry>,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: &str) -> Self {
        // Entries below the threshold are never built
        let entry = logger.enabled(level).then(|| LogEntry {
            timestamp: Utc::now(),
            level,
            component: logger.component.clone(),
            message: message.to_string(),
            session: logger.session.clone(),
            fields: BTreeMap::new(),
            location: None,
        });
        Self { logger, entry }
    }

    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Some(entry) = self.entry.as_mut() {
            if let Ok(value) = serde_json::to_value(value) {
                entry.fields.insert(key.to_string(), value);
            }
        }
        self
    }

    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        if let Some(entry) = self.entry.as_mut() {
            entry.location = Some(LogLocation {
                file: file.to_string(),
                line,
                module: module.map(String::from),
            });
        }
        self
    }

    /// Attach the coordinates and latency of one throw
    pub fn measurement(self, measurement: &ThrowMeasurement) -> Self {
        self.field("hammer", measurement.hammer)
            .field("throw", measurement.throw)
            .field("elapsed_secs", measurement.elapsed_secs)
    }

    /// Attach category and exit code of an error
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error", error.category())
            .field("exit_code", error.exit_code())
    }

    pub fn log(self) {
        if let Some(entry) = &self.entry {
            self.logger.write(entry);
        }
    }
}

/// Hands out loggers that share one run session id
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn create_logger(&self, component: &str) -> Result<Logger> {
        let mut logger = Logger::with_config(component.to_string(), &self.config);
        logger.apply_env_overrides()?;
        logger.session = Some(self.session_id.clone());
        Ok(logger)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
    };
}
