//! Rendering of the line-oriented result report
//!
//! These shapes are a stable contract that scripts parse, so they are never
//! colored and always print seconds with exactly two decimals.

use crate::models::{HammerResult, RunSummary, ThrowMeasurement};

/// `Hammer: <id>, Throw:   <n>, Elapsed Time: <seconds>`
pub fn format_throw(measurement: &ThrowMeasurement) -> String {
    format!(
        "Hammer: {}, Throw:   {}, Elapsed Time: {:.2}",
        measurement.hammer, measurement.throw, measurement.elapsed_secs
    )
}

/// `Hammer: <id>, AVERAGE   , Elapsed Time: <seconds>`
pub fn format_hammer_average(result: &HammerResult) -> String {
    format!(
        "Hammer: {}, AVERAGE   , Elapsed Time: {:.2}",
        result.hammer, result.average_secs
    )
}

/// `TOTAL AVERAGE ELAPSED TIME: <seconds>`
pub fn format_total_average(total_average_secs: f64) -> String {
    format!("TOTAL AVERAGE ELAPSED TIME: {:.2}", total_average_secs)
}

/// One-line digest of a run for debug logging
pub fn format_run_digest(summary: &RunSummary) -> String {
    format!(
        "{} hammers, {} throws, total average {:.2}s, wall time {:.2}s",
        summary.hammer_count(),
        summary.total_throws,
        summary.total_average_secs,
        summary.wall_time.as_secs_f64()
    )
}
