//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Numeric identifier of a hammer, dense over `0..hammers`
pub type HammerId = u32;

/// Lifecycle of a coordinated run
///
/// `Idle → Dispatching → AwaitingAll → Aggregated`, with `Failed` reachable
/// from `Dispatching` and `AwaitingAll`. There is no way back out of
/// `Aggregated` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinatorState {
    /// Nothing dispatched yet
    Idle,
    /// Hammer tasks are being spawned
    Dispatching,
    /// All hammers spawned, waiting on the join barrier
    AwaitingAll,
    /// Every hammer finished and the total average was computed
    Aggregated,
    /// A hammer failed; no aggregate was produced
    Failed,
}

impl CoordinatorState {
    /// Check whether the run can make no further progress
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Aggregated | Self::Failed)
    }

    /// Check whether moving to `next` is a legal transition
    pub fn can_transition_to(&self, next: CoordinatorState) -> bool {
        use CoordinatorState::*;
        matches!(
            (self, next),
            (Idle, Dispatching)
                | (Dispatching, AwaitingAll)
                | (Dispatching, Failed)
                | (AwaitingAll, Aggregated)
                | (AwaitingAll, Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dispatching => "dispatching",
            Self::AwaitingAll => "awaiting-all",
            Self::Aggregated => "aggregated",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
