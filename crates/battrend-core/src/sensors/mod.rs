//! Battery sensor adapter
//!
//! The platform delivers battery state as a loosely typed broadcast payload
//! whenever something changes. This module turns that payload into a
//! [`LatestReading`] where every field is either a real value or absent.

mod battery;

use core::future::Future;

use thiserror_no_std::Error;

pub use battery::{BatteryPayload, ChargeStatus, TEMPERATURE_UNSET};

/// Errors raised while decoding payloads or managing the subscription
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("Battery scale must be positive, got {scale}")]
    InvalidScale { scale: i32 },
    #[error("Battery payload is missing {field}")]
    MissingField { field: &'static str },
    #[error("Battery temperature is unset")]
    TemperatureUnset,
    #[error("Unknown charging status code {code}")]
    UnknownStatus { code: i32 },
    #[error("Battery monitor is already unsubscribed")]
    AlreadyUnsubscribed,
    #[error("Battery monitor subscription failed: {details}")]
    SubscribeFailed { details: &'static str },
}

/// The most recent values received from the battery sensor
///
/// A single current-value cell, not a history. Every field stays `None`
/// until the platform has reported it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatestReading {
    /// Battery temperature in °C
    pub temperature_c: Option<f32>,
    /// Battery charge in percent (0-100)
    pub battery_percent: Option<f32>,
    /// Whether the battery is charging or full
    pub charging: Option<bool>,
}

impl LatestReading {
    /// Reading with no values yet
    pub const EMPTY: Self = Self {
        temperature_c: None,
        battery_percent: None,
        charging: None,
    };
}

/// Source of battery payloads
///
/// Implemented by the platform glue (and by the simulator). Payloads may
/// arrive at any rate, including never.
pub trait BatteryMonitor {
    /// Start receiving battery notifications
    fn subscribe(&mut self) -> Result<(), SensorError>;

    /// Stop receiving battery notifications
    ///
    /// Returns [`SensorError::AlreadyUnsubscribed`] when called twice.
    fn unsubscribe(&mut self) -> Result<(), SensorError>;

    /// Wait for the next payload
    fn next_payload(&mut self) -> impl Future<Output = BatteryPayload>;
}

/// Unsubscribe, treating an already closed subscription as success
pub fn teardown<M: BatteryMonitor>(monitor: &mut M) {
    match monitor.unsubscribe() {
        Ok(()) => log::info!("Battery monitor unsubscribed"),
        Err(SensorError::AlreadyUnsubscribed) => {
            log::debug!("Battery monitor was already unsubscribed")
        }
        Err(e) => log::warn!("Battery monitor teardown failed: {}", e),
    }
}
