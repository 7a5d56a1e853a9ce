//! Per-second bar chart over the live window

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};

use crate::storage::{LIVE_WINDOW_SECS, LiveBuffer};
use crate::units::{TemperatureUnit, convert, display_color};

use super::constants::{LIGHT_GRAY, LIVE_BAR_GAP_PX};
use super::labels::{Label, format_axis_value};
use super::viewport::{DataBounds, Viewport, ViewportPadding, plot_area};
use super::{draw_grid, draw_placeholder};

/// First and last session second shown by the live chart
///
/// The window is anchored on the newest sample and covers exactly
/// [`LIVE_WINDOW_SECS`] one-second slots.
pub fn live_window(latest_second: u32) -> (u32, u32) {
    (
        latest_second.saturating_sub(LIVE_WINDOW_SECS - 1),
        latest_second,
    )
}

/// Label for the left edge of the live chart, e.g. "-60S"
///
/// The edge sits one full window before the newest bar's slot.
pub fn window_edge_label() -> Label {
    let mut s = Label::new();
    let _ = write!(s, "-{}S", LIVE_WINDOW_SECS);
    s
}

/// Bar chart of the live buffer, one bar per second, colored by band
#[derive(Debug, Clone, Copy)]
pub struct LiveChart {
    bounds: Rectangle,
    padding: ViewportPadding,
    unit: TemperatureUnit,
}

impl LiveChart {
    /// Create a live chart filling `bounds`
    pub fn new(bounds: Rectangle, unit: TemperatureUnit) -> Self {
        Self {
            bounds,
            padding: ViewportPadding::default(),
            unit,
        }
    }

    /// Override the default label padding
    pub fn with_padding(mut self, padding: ViewportPadding) -> Self {
        self.padding = padding;
        self
    }

    /// Screen rectangle of the bar for `second`, if it falls inside the window
    pub fn bar_rect(
        &self,
        viewport: &Viewport,
        window_start: u32,
        second: u32,
        value: f32,
    ) -> Option<Rectangle> {
        if second < window_start || second - window_start >= LIVE_WINDOW_SECS {
            return None;
        }

        let area = viewport.plot_area();
        let slot = second - window_start;
        let slot_width = (area.size.width / LIVE_WINDOW_SECS).max(1);
        let bar_width = slot_width.saturating_sub(LIVE_BAR_GAP_PX).max(1);

        let left = area.top_left.x + (slot * area.size.width / LIVE_WINDOW_SECS) as i32;
        let top = viewport.data_to_screen(second as f32, value)?.y;
        let bottom = area.top_left.y + area.size.height as i32;
        let height = (bottom - top).max(1) as u32;

        Some(Rectangle::new(
            Point::new(left, bottom - height as i32),
            Size::new(bar_width, height),
        ))
    }

    /// Draw the bars and axis labels for `buffer`
    pub fn draw<D>(&self, buffer: &LiveBuffer, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(latest) = buffer.latest() else {
            return draw_placeholder(self.bounds, "Waiting for sensor", display);
        };

        let (window_start, _) = live_window(latest.second);
        let Some((y_min, y_max)) =
            DataBounds::y_range_of(buffer.iter().map(|s| convert(s.temperature_c, self.unit)))
        else {
            return Ok(());
        };

        let viewport = Viewport::new(
            DataBounds::new(
                window_start as f32,
                (window_start + LIVE_WINDOW_SECS) as f32,
                y_min,
                y_max,
            ),
            self.bounds,
            self.padding,
        );
        draw_grid(viewport.plot_area(), display)?;

        for sample in buffer.iter() {
            let value = convert(sample.temperature_c, self.unit);
            if let Some(rect) = self.bar_rect(&viewport, window_start, sample.second, value) {
                rect.into_styled(PrimitiveStyle::with_fill(display_color(value, self.unit)))
                    .draw(display)?;
            }
        }

        self.draw_labels(y_min, y_max, display)
    }

    fn draw_labels<D>(&self, y_min: f32, y_max: f32, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let area = plot_area(self.bounds, self.padding);
        let style = MonoTextStyle::new(&FONT_6X10, LIGHT_GRAY);
        let label_y = area.top_left.y + area.size.height as i32 + 10;
        let right = area.top_left.x + area.size.width as i32;

        let oldest = window_edge_label();
        Text::with_alignment(&oldest, Point::new(area.top_left.x, label_y), style, Alignment::Left)
            .draw(display)?;
        Text::with_alignment("NOW", Point::new(right, label_y), style, Alignment::Right)
            .draw(display)?;

        let suffix = self.unit.suffix();
        let top = format_axis_value(y_max, suffix);
        let bottom = format_axis_value(y_min, suffix);
        let label_x = area.top_left.x - 3;
        Text::with_alignment(&top, Point::new(label_x, area.top_left.y + 8), style, Alignment::Right)
            .draw(display)?;
        Text::with_alignment(
            &bottom,
            Point::new(label_x, area.top_left.y + area.size.height as i32),
            style,
            Alignment::Right,
        )
        .draw(display)?;

        Ok(())
    }
}
