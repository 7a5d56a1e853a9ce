//! Label formatting for axes, header and footer
//!
//! Uses fixed-capacity heapless Strings to avoid heap allocations during rendering.

use core::fmt::Write;

use heapless::String;

use crate::storage::TrendStats;
use crate::units::{TemperatureUnit, convert};

use super::constants::{MAX_LABEL_LENGTH, PLACEHOLDER};

/// Formatted label text
pub type Label = String<MAX_LABEL_LENGTH>;

/// Format a session-clock position as elapsed time (e.g. "45S", "12M", "3H", "2D")
pub fn format_elapsed(secs: u32) -> Label {
    let mut s = String::new();
    let _ = if secs >= 86400 {
        write!(s, "{}D", secs / 86400)
    } else if secs >= 3600 {
        write!(s, "{}H", secs / 3600)
    } else if secs >= 60 {
        write!(s, "{}M", secs / 60)
    } else {
        write!(s, "{}S", secs)
    };
    s
}

/// Format a Celsius reading in the display unit, or the placeholder
pub fn format_temperature(celsius: Option<f32>, unit: TemperatureUnit) -> Label {
    let mut s = String::new();
    let _ = match celsius {
        Some(c) => write!(s, "{:.1}{}", convert(c, unit), unit.suffix()),
        None => write!(s, "{}{}", PLACEHOLDER, unit.suffix()),
    };
    s
}

/// Format an axis value already in display units, without decimals
pub fn format_axis_value(value: f32, suffix: &str) -> Label {
    let mut s = String::new();
    let _ = write!(s, "{:.0}{}", value, suffix);
    s
}

/// Format a battery percentage, or the placeholder
pub fn format_battery(percent: Option<f32>, charging: Option<bool>) -> Label {
    let mut s = String::new();
    let _ = match percent {
        Some(p) => write!(s, "{:.0}%", p),
        None => write!(s, "{}%", PLACEHOLDER),
    };
    if charging == Some(true) {
        let _ = s.push_str(" CHG");
    }
    s
}

/// Format the battery range of a history copy (e.g. "BAT 40-80%")
pub fn format_battery_range(stats: &TrendStats) -> Label {
    let mut s = String::new();
    let _ = if stats.is_empty() {
        write!(s, "BAT {}%", PLACEHOLDER)
    } else {
        write!(s, "BAT {:.0}-{:.0}%", stats.min, stats.max)
    };
    s
}
