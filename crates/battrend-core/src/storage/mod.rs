//! Session-scoped sample history
//!
//! Two independent buffers share the session clock as their x coordinate:
//!
//! - [`LiveBuffer`]: one [`LiveSample`] per second, trimmed to a rolling
//!   60-second window relative to its own newest entry.
//! - [`SnapshotBuffer`]: one [`SnapshotPoint`] per minute, capped at 4,320
//!   entries (3 days). Each push evicts at most one entry.
//!
//! Nothing here is persisted. Both buffers live and die with the session.

mod live;
mod snapshot;
mod stats;

pub use live::{FrozenLive, LiveBuffer};
pub use snapshot::{FrozenSnapshot, SnapshotBuffer};
pub use stats::TrendStats;

/// Width of the live window in seconds
pub const LIVE_WINDOW_SECS: u32 = 60;

/// Maximum number of samples the live window can hold (one per second)
pub const LIVE_CAPACITY: usize = LIVE_WINDOW_SECS as usize;

/// Maximum number of snapshot points (3 days at 1-minute resolution)
pub const SNAPSHOT_CAPACITY: usize = 4320;

/// Minimum x-axis span of the snapshot chart (20 minutes)
pub const SNAPSHOT_DEFAULT_HORIZON_SECS: u32 = 1200;

/// One bar of the live chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveSample {
    /// Session second at which the sample was taken
    pub second: u32,
    /// Battery temperature in °C
    pub temperature_c: f32,
}

impl LiveSample {
    /// Create a new live sample
    pub const fn new(second: u32, temperature_c: f32) -> Self {
        Self {
            second,
            temperature_c,
        }
    }
}

/// One point of the long-horizon trend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotPoint {
    /// Session second at which the point was taken
    pub second: u32,
    /// Battery temperature in °C
    pub temperature_c: f32,
    /// Battery charge in percent (0-100)
    pub battery_percent: f32,
}

impl SnapshotPoint {
    /// Create a new snapshot point
    pub const fn new(second: u32, temperature_c: f32, battery_percent: f32) -> Self {
        Self {
            second,
            temperature_c,
            battery_percent,
        }
    }
}

/// Why an append left a buffer untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Temperature was not known at tick time
    MissingTemperature,
    /// Battery percentage was not known at tick time
    MissingBattery,
    /// The second did not advance past the newest stored entry
    NotAdvancing {
        /// Second of the newest stored entry
        newest: u32,
        /// Second that was offered
        offered: u32,
    },
}

/// Result of appending to one of the history buffers
///
/// Overflow is never an error: it is reported as [`AppendOutcome::Appended`]
/// with the number of entries evicted to make room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The entry was stored; `evicted` older entries were dropped
    Appended {
        /// Number of entries removed from the head
        evicted: usize,
    },
    /// Nothing was stored
    Skipped(SkipReason),
}

impl AppendOutcome {
    /// Whether the entry was stored
    pub const fn is_appended(&self) -> bool {
        matches!(self, Self::Appended { .. })
    }

    /// Number of entries evicted by this append
    pub const fn evicted(&self) -> usize {
        match self {
            Self::Appended { evicted } => *evicted,
            Self::Skipped(_) => 0,
        }
    }
}
