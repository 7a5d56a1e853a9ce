//! Decoding of the platform battery broadcast

use log::warn;

use super::{LatestReading, SensorError};

/// Sentinel the platform uses for "temperature not reported"
pub const TEMPERATURE_UNSET: i32 = i32::MIN;

/// Platform charging status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeStatus {
    Unknown,
    Charging,
    Discharging,
    NotCharging,
    Full,
}

impl ChargeStatus {
    /// Map a platform status code
    pub const fn from_code(code: i32) -> Result<Self, SensorError> {
        match code {
            1 => Ok(Self::Unknown),
            2 => Ok(Self::Charging),
            3 => Ok(Self::Discharging),
            4 => Ok(Self::NotCharging),
            5 => Ok(Self::Full),
            _ => Err(SensorError::UnknownStatus { code }),
        }
    }

    /// Platform code for this status
    pub const fn code(self) -> i32 {
        match self {
            Self::Unknown => 1,
            Self::Charging => 2,
            Self::Discharging => 3,
            Self::NotCharging => 4,
            Self::Full => 5,
        }
    }

    /// Charging means actively charging or topped off on the charger
    pub const fn is_charging(self) -> bool {
        matches!(self, Self::Charging | Self::Full)
    }
}

/// Raw battery broadcast as delivered by the platform
///
/// Any field may be missing. Values are kept in platform units: level out
/// of `scale`, temperature in tenths of a degree Celsius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatteryPayload {
    pub level: Option<i32>,
    pub scale: Option<i32>,
    pub temperature_tenths: Option<i32>,
    pub status: Option<i32>,
}

impl BatteryPayload {
    /// Battery charge in percent, clamped to 0-100
    pub fn battery_percent(&self) -> Result<f32, SensorError> {
        let level = self
            .level
            .ok_or(SensorError::MissingField { field: "level" })?;
        let scale = self
            .scale
            .ok_or(SensorError::MissingField { field: "scale" })?;
        if scale <= 0 {
            return Err(SensorError::InvalidScale { scale });
        }

        let percent = level as f32 * 100.0 / scale as f32;
        Ok(percent.clamp(0.0, 100.0))
    }

    /// Battery temperature in °C
    pub fn temperature_c(&self) -> Result<f32, SensorError> {
        match self.temperature_tenths {
            None => Err(SensorError::MissingField {
                field: "temperature",
            }),
            Some(TEMPERATURE_UNSET) => Err(SensorError::TemperatureUnset),
            Some(tenths) => Ok(tenths as f32 / 10.0),
        }
    }

    /// Charging status
    pub fn charge_status(&self) -> Result<ChargeStatus, SensorError> {
        let code = self
            .status
            .ok_or(SensorError::MissingField { field: "status" })?;
        ChargeStatus::from_code(code)
    }

    /// Decode into a reading, turning every malformed field into "absent"
    pub fn decode(&self) -> LatestReading {
        LatestReading {
            temperature_c: absent_on_error(self.temperature_c()),
            battery_percent: absent_on_error(self.battery_percent()),
            charging: absent_on_error(self.charge_status()).map(ChargeStatus::is_charging),
        }
    }
}

fn absent_on_error<T>(result: Result<T, SensorError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(SensorError::MissingField { field }) => {
            log::debug!("Battery payload has no {}", field);
            None
        }
        Err(e) => {
            warn!("Ignoring battery field: {}", e);
            None
        }
    }
}
