//! Latency averaging
//!
//! Every number thor reports is a mean of seconds rounded to hundredths.
//! Throw latencies are rounded before they are summed, worker averages are
//! rounded before they are aggregated, and the total is rounded once more.

use crate::error::{AppError, Result};

/// Round a value in seconds to two decimal places
///
/// The exact binary value is rounded, with exact ties going to the even
/// digit, so `0.125` becomes `0.12` and `2.675` (stored just below) `2.67`.
/// Decimal formatting is correctly rounded, scaling by 100 first is not.
pub fn round_to_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Average `total` over `count` samples, rounded to hundredths
///
/// A zero `count` is rejected instead of producing NaN or infinity.
pub fn average_rounded(total: f64, count: u32) -> Result<f64> {
    if count == 0 {
        return Err(AppError::statistics("cannot average over zero samples"));
    }
    Ok(round_to_hundredths(total / f64::from(count)))
}

/// Mean of a slice of values, rounded to hundredths
pub fn mean_rounded(values: &[f64]) -> Result<f64> {
    let count = u32::try_from(values.len())
        .map_err(|_| AppError::statistics(format!("too many samples: {}", values.len())))?;
    average_rounded(values.iter().sum(), count)
}

/// Running sum owned by a single hammer
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunningAverage {
    total: f64,
    count: u32,
}

impl RunningAverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one already-rounded sample
    pub fn record(&mut self, sample: f64) {
        self.total += sample;
        self.count += 1;
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Rounded mean of everything recorded so far
    pub fn average(&self) -> Result<f64> {
        average_rounded(self.total, self.count)
    }
}
