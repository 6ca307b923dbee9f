//! Throw measurements and hammer/run results

use crate::error::Result;
use crate::stats::{mean_rounded, round_to_hundredths};
use crate::types::HammerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Elapsed time of one throw, in seconds rounded to hundredths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowMeasurement {
    pub hammer: HammerId,
    pub throw: u32,
    pub elapsed_secs: f64,
}

impl ThrowMeasurement {
    /// Build a measurement from a raw elapsed duration
    pub fn from_elapsed(hammer: HammerId, throw: u32, elapsed: Duration) -> Self {
        Self {
            hammer,
            throw,
            elapsed_secs: round_to_hundredths(elapsed.as_secs_f64()),
        }
    }
}

/// Average latency reported by a single hammer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HammerResult {
    pub hammer: HammerId,
    pub average_secs: f64,
}

/// Outcome of a fully aggregated run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Per-hammer averages, indexed by hammer id
    pub hammer_averages: Vec<f64>,
    /// Mean of `hammer_averages`, rounded to hundredths
    pub total_average_secs: f64,
    /// Number of requests issued across all hammers
    pub total_throws: u64,
    /// Wall-clock time of the whole run
    pub wall_time: Duration,
    pub started_at: DateTime<Utc>,
}

impl RunSummary {
    /// Aggregate hammer results that are already ordered by id
    pub fn from_results(
        results: &[HammerResult],
        throws_per_hammer: u32,
        wall_time: Duration,
        started_at: DateTime<Utc>,
    ) -> Result<Self> {
        let hammer_averages: Vec<f64> = results.iter().map(|r| r.average_secs).collect();
        let total_average_secs = mean_rounded(&hammer_averages)?;

        Ok(Self {
            total_throws: hammer_averages.len() as u64 * u64::from(throws_per_hammer),
            hammer_averages,
            total_average_secs,
            wall_time,
            started_at,
        })
    }

    pub fn hammer_count(&self) -> usize {
        self.hammer_averages.len()
    }
}
