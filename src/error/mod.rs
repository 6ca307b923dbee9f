//! Error handling for the thor load generator

use colored::*;
use thiserror::Error;

/// Everything that can stop a run
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad arguments, environment values or `.env` contents
    #[error("Configuration error: {0}")]
    Config(String),

    /// The target could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The exchange started but did not complete
    #[error("HTTP request error: {0}")]
    HttpRequest(String),

    /// The target answered with a non-2xx status
    #[error("HTTP status error: {url} returned {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Writing the report failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed URL or log setting
    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Statistics error: {0}")]
    Statistics(String),

    /// A hammer task panicked or was cancelled
    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn http_request<S: Into<String>>(message: S) -> Self {
        Self::HttpRequest(message.into())
    }

    pub fn http_status<S: Into<String>>(url: S, status: u16) -> Self {
        Self::HttpStatus { url: url.into(), status }
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    pub fn statistics<S: Into<String>>(message: S) -> Self {
        Self::Statistics(message.into())
    }

    pub fn execution<S: Into<String>>(message: S) -> Self {
        Self::Execution(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Short tag used in log fields and console output
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Network(_) => "NETWORK",
            Self::HttpRequest(_) | Self::HttpStatus { .. } => "HTTP",
            Self::Timeout(_) => "TIMEOUT",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Statistics(_) => "STATS",
            Self::Execution(_) => "EXEC",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether the error came from user input rather than from the run
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Parse(_))
    }

    /// Process exit status for this error
    ///
    /// 1 usage, 2 network/HTTP, 3 timeout, 5 I/O, 6 execution, 99 internal.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Parse(_) => 1,
            Self::Network(_) | Self::HttpRequest(_) | Self::HttpStatus { .. } => 2,
            Self::Timeout(_) => 3,
            Self::Io(_) => 5,
            Self::Statistics(_) | Self::Execution(_) => 6,
            Self::Internal(_) => 99,
        }
    }

    /// What the user can try next, if anything useful can be said
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) | Self::Parse(_) => {
                Some("HAMMERS and THROWS must be positive integers and URL must start with http:// or https://.")
            }
            Self::Network(_) => Some("Check that the target host is reachable and accepting connections."),
            Self::HttpRequest(_) => Some("The server closed or broke the exchange before the body arrived."),
            Self::HttpStatus { .. } => Some("Only 2xx responses count as successful throws. Check the URL path."),
            Self::Timeout(_) => Some("Increase --timeout or reduce the number of hammers."),
            Self::Io(_) => Some("Check that standard output is writable."),
            Self::Execution(_) => Some("Re-run with --debug for details."),
            Self::Statistics(_) | Self::Internal(_) => None,
        }
    }

    /// `[CATEGORY] message`, colored by severity when asked
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if !use_color {
            return format!("[{}] {}", category, message);
        }

        let color = match self {
            Self::Config(_) | Self::Parse(_) => Color::Red,
            Self::Network(_) | Self::HttpRequest(_) | Self::HttpStatus { .. } => Color::Yellow,
            Self::Timeout(_) => Color::Blue,
            Self::Io(_) | Self::Statistics(_) | Self::Execution(_) => Color::Cyan,
            Self::Internal(_) => Color::BrightRed,
        };
        format!("[{}] {}", category.color(color).bold(), message.color(color))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else if let Some(status) = error.status() {
            let url = error.url().map(|u| u.to_string()).unwrap_or_default();
            Self::http_status(url, status.as_u16())
        } else if error.is_connect() || error.is_request() {
            Self::network(error.to_string())
        } else {
            Self::http_request(error.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> Self {
        if error.is_cancelled() {
            Self::execution(format!("hammer task was cancelled: {}", error))
        } else {
            Self::execution(format!("hammer task panicked: {}", error))
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Prints errors to standard error
pub struct ErrorReporter {
    pub use_color: bool,
    /// Append the hint below the message
    pub verbose: bool,
}

impl ErrorReporter {
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    pub fn render(&self, error: &AppError) -> String {
        let mut report = error.format_for_console(self.use_color);
        if self.verbose {
            if let Some(hint) = error.hint() {
                report.push_str("\n  hint: ");
                report.push_str(hint);
            }
        }
        report
    }

    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}
