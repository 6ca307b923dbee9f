//! Thor
//!
//! A minimal concurrent HTTP load generator. A number of hammers each make a
//! number of sequential GET requests (throws) against one URL; every throw is
//! timed, each hammer reports its average, and the run reports the average of
//! the hammer averages.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use client::{HttpClient, HttpRequest, HttpResponse, NetworkClient};
pub use error::{AppError, Result};
pub use executor::{coordinate, Coordinator, Hammer};
pub use models::{Config, HammerResult, RunSummary, ThrowMeasurement};
pub use output::{BufferSink, ReportSink, StdoutSink};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_HAMMERS: u32 = 1;
    pub const DEFAULT_THROWS: u32 = 1;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
