//! Viewport and coordinate transformation utilities
//!
//! Handles transformation between data space (session seconds, temperatures,
//! percentages) and screen space (pixel coordinates).

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::constants::{
    AUTO_SCALE_MARGIN_FACTOR, DEFAULT_VIEWPORT_PADDING_BOTTOM_PX,
    DEFAULT_VIEWPORT_PADDING_LEFT_PX, DEFAULT_VIEWPORT_PADDING_RIGHT_PX,
    DEFAULT_VIEWPORT_PADDING_TOP_PX, MIN_DATA_RANGE,
};

/// Data space bounds (min/max x and y values)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl DataBounds {
    /// Create new data bounds
    pub const fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Y bounds enclosing `values` with the default auto-scale margin
    ///
    /// Returns `None` for an empty sequence. A flat series still gets a
    /// non-zero range so it lands mid-plot instead of dividing by zero.
    pub fn y_range_of(values: impl IntoIterator<Item = f32>) -> Option<(f32, f32)> {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        let range = (max - min).max(MIN_DATA_RANGE);
        let margin = (range * AUTO_SCALE_MARGIN_FACTOR).max(MIN_Y_MARGIN);
        Some((min - margin, max + margin))
    }

    /// Get the X range (width)
    pub fn x_range(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Get the Y range (height)
    pub fn y_range(&self) -> f32 {
        self.y_max - self.y_min
    }
}

/// Smallest margin added above and below an auto-scaled series, in display units
const MIN_Y_MARGIN: f32 = 0.5;

/// Padding around the plot area for labels and margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPadding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for ViewportPadding {
    fn default() -> Self {
        Self {
            top: DEFAULT_VIEWPORT_PADDING_TOP_PX,
            right: DEFAULT_VIEWPORT_PADDING_RIGHT_PX,
            bottom: DEFAULT_VIEWPORT_PADDING_BOTTOM_PX,
            left: DEFAULT_VIEWPORT_PADDING_LEFT_PX,
        }
    }
}

impl ViewportPadding {
    /// Create uniform padding on all sides
    pub const fn uniform(padding: u32) -> Self {
        Self {
            top: padding,
            right: padding,
            bottom: padding,
            left: padding,
        }
    }
}

/// Viewport for transforming data coordinates to screen coordinates
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    data_bounds: DataBounds,
    screen_bounds: Rectangle,
    padding: ViewportPadding,
}

impl Viewport {
    /// Create a new viewport
    pub fn new(data_bounds: DataBounds, screen_bounds: Rectangle, padding: ViewportPadding) -> Self {
        Self {
            data_bounds,
            screen_bounds,
            padding,
        }
    }

    /// Get the plot area (screen bounds minus padding)
    pub fn plot_area(&self) -> Rectangle {
        plot_area(self.screen_bounds, self.padding)
    }

    /// Transform a data point to screen coordinates
    ///
    /// Values outside the data bounds are clamped to the plot edge so a
    /// series never draws over the axis labels.
    pub fn data_to_screen(&self, x: f32, y: f32) -> Option<Point> {
        let plot_area = self.plot_area();

        // Normalize to 0.0-1.0 range
        let x_norm = (x - self.data_bounds.x_min) / self.data_bounds.x_range();
        let y_norm = (y - self.data_bounds.y_min) / self.data_bounds.y_range();

        if !x_norm.is_finite() || !y_norm.is_finite() {
            return None;
        }

        let x_norm = x_norm.clamp(0.0, 1.0);
        let y_norm = y_norm.clamp(0.0, 1.0);

        // Note: y-axis is inverted (screen Y increases downward)
        let screen_x = plot_area.top_left.x
            + (x_norm * plot_area.size.width.saturating_sub(1) as f32) as i32;
        let screen_y = plot_area.top_left.y
            + ((1.0 - y_norm) * plot_area.size.height.saturating_sub(1) as f32) as i32;

        Some(Point::new(screen_x, screen_y))
    }

    /// Get the data bounds
    pub fn data_bounds(&self) -> &DataBounds {
        &self.data_bounds
    }
}

/// Screen bounds minus padding
pub fn plot_area(screen_bounds: Rectangle, padding: ViewportPadding) -> Rectangle {
    let top_left = Point::new(
        screen_bounds.top_left.x + padding.left as i32,
        screen_bounds.top_left.y + padding.top as i32,
    );

    let width = screen_bounds
        .size
        .width
        .saturating_sub(padding.left + padding.right);
    let height = screen_bounds
        .size
        .height
        .saturating_sub(padding.top + padding.bottom);

    Rectangle::new(top_left, Size::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(
            DataBounds::new(0.0, 100.0, 0.0, 10.0),
            Rectangle::new(Point::new(0, 0), Size::new(101, 11)),
            ViewportPadding::uniform(0),
        )
    }

    #[test]
    fn test_corners_map_to_plot_edges() {
        let vp = viewport();
        assert_eq!(vp.data_to_screen(0.0, 0.0), Some(Point::new(0, 10)));
        assert_eq!(vp.data_to_screen(100.0, 10.0), Some(Point::new(100, 0)));
        assert_eq!(vp.data_to_screen(50.0, 5.0), Some(Point::new(50, 5)));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let vp = viewport();
        assert_eq!(vp.data_to_screen(-10.0, 20.0), Some(Point::new(0, 0)));
    }

    #[test]
    fn test_degenerate_bounds_are_rejected() {
        let vp = Viewport::new(
            DataBounds::new(5.0, 5.0, 0.0, 1.0),
            Rectangle::new(Point::zero(), Size::new(10, 10)),
            ViewportPadding::uniform(0),
        );
        assert_eq!(vp.data_to_screen(5.0, 0.5), None);
    }

    #[test]
    fn test_y_range_adds_margin() {
        let (lo, hi) = DataBounds::y_range_of([20.0, 30.0]).unwrap();
        assert!(lo < 20.0 && hi > 30.0);
        assert!((lo - 19.0).abs() < 1e-4);
        assert!((hi - 31.0).abs() < 1e-4);

        let (lo, hi) = DataBounds::y_range_of([25.0]).unwrap();
        assert!(lo < 25.0 && hi > 25.0);
        assert!(DataBounds::y_range_of(core::iter::empty()).is_none());
    }

    #[test]
    fn test_padding_shrinks_plot_area() {
        let area = plot_area(
            Rectangle::new(Point::new(10, 20), Size::new(100, 50)),
            ViewportPadding {
                top: 5,
                right: 10,
                bottom: 15,
                left: 20,
            },
        );
        assert_eq!(area, Rectangle::new(Point::new(30, 25), Size::new(70, 30)));
    }
}
