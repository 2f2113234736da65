pub mod controller;
pub mod loop_worker;

pub use controller::{start_update_loop, UpdateLoopController, UpdateLoopHandle};
pub use loop_worker::refresh_once;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_INTERVAL_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LoopStatus {
    Idle,
    Refreshing,
}

/// What a tick does while an earlier cycle is still waiting on the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CyclePolicy {
    /// Start another cycle anyway; cycles may overlap.
    #[default]
    Concurrent,
    /// Drop the tick.
    SkipIfBusy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub interval: Duration,
    pub policy: CyclePolicy,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            policy: CyclePolicy::Concurrent,
        }
    }
}

impl LoopConfig {
    pub fn with_interval_ms(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            ..Self::default()
        }
    }
}
