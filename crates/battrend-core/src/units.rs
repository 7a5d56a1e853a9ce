//! Temperature unit conversion and band classification
//!
//! All readings are stored in degrees Celsius. Conversion into the display
//! unit happens only at the edge (labels and chart axes).

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::WebColors;
use serde::{Deserialize, Serialize};

/// Offset between the Celsius and Kelvin scales
pub const KELVIN_OFFSET: f32 = 273.15;

/// Band thresholds in °F. A value belongs to the first band whose upper
/// bound it is strictly below; anything at or above the last bound is critical.
const BAND_UPPER_BOUNDS_F: [f32; 6] = [50.0, 70.0, 80.0, 90.0, 100.0, 110.0];

/// Display unit for temperatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    /// Degrees Celsius
    #[default]
    Celsius,
    /// Degrees Fahrenheit
    Fahrenheit,
    /// Kelvin
    Kelvin,
}

impl TemperatureUnit {
    /// Label appended to values shown in this unit
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
            Self::Kelvin => "K",
        }
    }

    /// Next unit in the settings cycle (C -> F -> K -> C)
    pub const fn next(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Kelvin,
            Self::Kelvin => Self::Celsius,
        }
    }

    /// Parse a unit from a short name ("c", "f", "k", or the full name)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("c") || name.eq_ignore_ascii_case("celsius") {
            Some(Self::Celsius)
        } else if name.eq_ignore_ascii_case("f") || name.eq_ignore_ascii_case("fahrenheit") {
            Some(Self::Fahrenheit)
        } else if name.eq_ignore_ascii_case("k") || name.eq_ignore_ascii_case("kelvin") {
            Some(Self::Kelvin)
        } else {
            None
        }
    }
}

/// Convert Celsius to Fahrenheit
pub fn to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert Fahrenheit to Celsius
pub fn fahrenheit_to_celsius(fahrenheit: f32) -> f32 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Convert a Celsius reading into the given display unit
pub fn convert(celsius: f32, unit: TemperatureUnit) -> f32 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => to_fahrenheit(celsius),
        TemperatureUnit::Kelvin => celsius + KELVIN_OFFSET,
    }
}

/// Convert a value expressed in `unit` back to Celsius
pub fn to_celsius(value: f32, unit: TemperatureUnit) -> f32 {
    match unit {
        TemperatureUnit::Celsius => value,
        TemperatureUnit::Fahrenheit => fahrenheit_to_celsius(value),
        TemperatureUnit::Kelvin => value - KELVIN_OFFSET,
    }
}

/// Seven-step temperature band used to color bars and the header value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TemperatureBand {
    /// Below 50 °F
    Cold,
    /// 50 to 70 °F
    Cool,
    /// 70 to 80 °F
    Comfortable,
    /// 80 to 90 °F
    Warm,
    /// 90 to 100 °F
    Hot,
    /// 100 to 110 °F
    VeryHot,
    /// 110 °F and above
    Critical,
}

impl TemperatureBand {
    const ALL: [Self; 7] = [
        Self::Cold,
        Self::Cool,
        Self::Comfortable,
        Self::Warm,
        Self::Hot,
        Self::VeryHot,
        Self::Critical,
    ];

    /// Classify a value already expressed in `unit`
    ///
    /// Celsius and Kelvin inputs are mapped onto the Fahrenheit thresholds,
    /// which keeps the band edges linearly equivalent across units.
    pub fn classify(value: f32, unit: TemperatureUnit) -> Self {
        let fahrenheit = to_fahrenheit(to_celsius(value, unit));
        Self::classify_fahrenheit(fahrenheit)
    }

    /// Classify a Celsius reading
    pub fn from_celsius(celsius: f32) -> Self {
        Self::classify_fahrenheit(to_fahrenheit(celsius))
    }

    fn classify_fahrenheit(fahrenheit: f32) -> Self {
        BAND_UPPER_BOUNDS_F
            .iter()
            .position(|bound| fahrenheit < *bound)
            .map(|i| Self::ALL[i])
            .unwrap_or(Self::Critical)
    }

    /// Bar and text color for this band
    pub const fn color(self) -> Rgb565 {
        match self {
            Self::Cold => Rgb565::CSS_BLUE,
            Self::Cool => Rgb565::CSS_CYAN,
            Self::Comfortable => Rgb565::CSS_GREEN,
            Self::Warm => Rgb565::CSS_YELLOW,
            Self::Hot => Rgb565::CSS_ORANGE,
            Self::VeryHot => Rgb565::CSS_ORANGE_RED,
            Self::Critical => Rgb565::CSS_RED,
        }
    }

    /// Short label for this band
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cold => "Cold",
            Self::Cool => "Cool",
            Self::Comfortable => "OK",
            Self::Warm => "Warm",
            Self::Hot => "Hot",
            Self::VeryHot => "Very hot",
            Self::Critical => "Critical",
        }
    }
}

/// Display color for a value expressed in `unit`
pub fn display_color(value: f32, unit: TemperatureUnit) -> Rgb565 {
    TemperatureBand::classify(value, unit).color()
}
