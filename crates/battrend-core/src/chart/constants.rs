//! Constants for chart rendering
//!
//! RGB565 format: R(5 bits), G(6 bits), B(5 bits)
//! Convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;

// ============================================================================
// Colors
// ============================================================================

/// Chart background - very dark gray-blue
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::new(18 >> 3, 23 >> 2, 24 >> 3);

/// Header and footer strip background
pub const COLOR_FOREGROUND: Rgb565 = Rgb565::new(26 >> 3, 32 >> 2, 33 >> 3);

/// Pure white - maximum brightness in RGB565
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Light gray - for axis labels and placeholders
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// Very faint gray for grid lines
pub const FAINT_GRAY: Rgb565 = Rgb565::new(10, 20, 10);

/// Battery series color - bright teal-green
pub const COLOR_BATTERY_SERIES: Rgb565 = Rgb565::new(95 >> 3, 185 >> 2, 141 >> 3);

/// Temperature series color on the snapshot chart - warm orange
pub const COLOR_TEMPERATURE_SERIES: Rgb565 = Rgb565::new(200 >> 3, 145 >> 2, 85 >> 3);

// ============================================================================
// Layout
// ============================================================================

/// Height of the header strip in pixels
pub const HEADER_HEIGHT_PX: u32 = 28;

/// Height of the footer strip in pixels
pub const FOOTER_HEIGHT_PX: u32 = 20;

/// Default viewport padding for top edge in pixels
pub const DEFAULT_VIEWPORT_PADDING_TOP_PX: u32 = 6;

/// Default viewport padding for right edge in pixels (right axis labels)
pub const DEFAULT_VIEWPORT_PADDING_RIGHT_PX: u32 = 30;

/// Default viewport padding for bottom edge in pixels (x-axis labels)
pub const DEFAULT_VIEWPORT_PADDING_BOTTOM_PX: u32 = 14;

/// Default viewport padding for left edge in pixels (left axis labels)
pub const DEFAULT_VIEWPORT_PADDING_LEFT_PX: u32 = 36;

/// Gap between neighbouring live bars in pixels
pub const LIVE_BAR_GAP_PX: u32 = 1;

/// Line width for snapshot series in pixels
pub const SERIES_LINE_WIDTH_PX: u32 = 2;

/// Number of horizontal grid lines inside the plot area
pub const GRID_LINE_COUNT: u32 = 3;

// ============================================================================
// Scaling
// ============================================================================

/// Minimum data range for auto-scaling (prevents division by zero)
pub const MIN_DATA_RANGE: f32 = 0.001;

/// Margin factor for auto-scaling bounds (10% padding)
pub const AUTO_SCALE_MARGIN_FACTOR: f32 = 0.1;

/// Maximum length of formatted labels (characters)
pub const MAX_LABEL_LENGTH: usize = 24;

/// Placeholder shown for values that have not been reported yet
pub const PLACEHOLDER: &str = "--";
