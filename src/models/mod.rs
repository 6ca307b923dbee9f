//! Data models and structures for the load generator

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::Config;
pub use metrics::{HammerResult, RunSummary, ThrowMeasurement};
