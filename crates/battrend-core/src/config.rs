//! Display and sampling configuration

use alloc::vec::Vec;

use embassy_time::Duration;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::storage::{LIVE_WINDOW_SECS, SNAPSHOT_CAPACITY, SNAPSHOT_DEFAULT_HORIZON_SECS};
use crate::units::TemperatureUnit;

/// Period of the live tick in milliseconds
pub const LIVE_TICK_PERIOD_MS: u64 = 1000;

/// Period of the snapshot tick in milliseconds
pub const SNAPSHOT_TICK_PERIOD_MS: u64 = 60_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config encoding failed: {0}")]
    Encode(postcard::Error),
    #[error("Config decoding failed: {0}")]
    Decode(postcard::Error),
}

/// Persistent user preferences plus the sampling constants they run with
///
/// Only the preferences are meant to change; the sampling values default to
/// the constants the history buffers are sized for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Unit used for every displayed temperature
    pub unit: TemperatureUnit,
    /// Live tick period in milliseconds
    pub live_tick_ms: u64,
    /// Snapshot tick period in milliseconds
    pub snapshot_tick_ms: u64,
    /// Minimum x-axis span of the snapshot chart in seconds
    pub snapshot_horizon_secs: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit: TemperatureUnit::default(),
            live_tick_ms: LIVE_TICK_PERIOD_MS,
            snapshot_tick_ms: SNAPSHOT_TICK_PERIOD_MS,
            snapshot_horizon_secs: SNAPSHOT_DEFAULT_HORIZON_SECS,
        }
    }
}

impl Config {
    /// Default config displaying the given unit
    pub fn with_unit(unit: TemperatureUnit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    /// Live tick period
    pub fn live_period(&self) -> Duration {
        Duration::from_millis(self.live_tick_ms)
    }

    /// Snapshot tick period
    pub fn snapshot_period(&self) -> Duration {
        Duration::from_millis(self.snapshot_tick_ms)
    }

    /// Width of the live chart window in seconds
    pub const fn live_window_secs(&self) -> u32 {
        LIVE_WINDOW_SECS
    }

    /// Number of points the snapshot history keeps
    pub const fn snapshot_capacity(&self) -> usize {
        SNAPSHOT_CAPACITY
    }

    /// Encode for a settings slot
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(ConfigError::Encode)
    }

    /// Decode from a settings slot
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(ConfigError::Decode)
    }
}
