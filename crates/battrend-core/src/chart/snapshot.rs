//! Long-horizon trend chart over a frozen snapshot
//!
//! Temperature and battery charge share the x axis (session seconds). The
//! temperature series is auto-scaled against the left axis in the display
//! unit; battery charge uses a fixed 0-100 % range on the right axis.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};

use crate::storage::{FrozenSnapshot, SNAPSHOT_DEFAULT_HORIZON_SECS};
use crate::units::{TemperatureUnit, convert};

use super::constants::{
    COLOR_BATTERY_SERIES, COLOR_TEMPERATURE_SERIES, LIGHT_GRAY, SERIES_LINE_WIDTH_PX,
};
use super::labels::{format_axis_value, format_battery_range, format_elapsed};
use super::viewport::{DataBounds, Viewport, ViewportPadding};
use super::{draw_grid, draw_placeholder};

const BATTERY_AXIS_MIN: f32 = 0.0;
const BATTERY_AXIS_MAX: f32 = 100.0;

/// X axis bounds for points starting at `first` and ending at `last`
///
/// The axis always spans at least `horizon_secs` from the first point, so
/// a young session fills the chart from the left.
pub fn x_bounds(first: u32, last: u32, horizon_secs: u32) -> (u32, u32) {
    (first, last.max(first.saturating_add(horizon_secs)))
}

/// Dual-series line chart of a [`FrozenSnapshot`]
#[derive(Debug, Clone, Copy)]
pub struct SnapshotChart {
    bounds: Rectangle,
    padding: ViewportPadding,
    unit: TemperatureUnit,
    horizon_secs: u32,
}

impl SnapshotChart {
    /// Create a snapshot chart filling `bounds`
    pub fn new(bounds: Rectangle, unit: TemperatureUnit) -> Self {
        Self {
            bounds,
            padding: ViewportPadding::default(),
            unit,
            horizon_secs: SNAPSHOT_DEFAULT_HORIZON_SECS,
        }
    }

    /// Override the minimum x axis span
    pub fn with_horizon(mut self, horizon_secs: u32) -> Self {
        self.horizon_secs = horizon_secs;
        self
    }

    /// Override the default label padding
    pub fn with_padding(mut self, padding: ViewportPadding) -> Self {
        self.padding = padding;
        self
    }

    /// Viewports for the temperature and battery series, in that order
    pub fn viewports(&self, frozen: &FrozenSnapshot) -> Option<(Viewport, Viewport)> {
        let (first, last) = frozen.time_range()?;
        let (x_min, x_max) = x_bounds(first, last, self.horizon_secs);
        let (y_min, y_max) = DataBounds::y_range_of(
            frozen
                .points()
                .iter()
                .map(|p| convert(p.temperature_c, self.unit)),
        )?;

        let temperature = Viewport::new(
            DataBounds::new(x_min as f32, x_max as f32, y_min, y_max),
            self.bounds,
            self.padding,
        );
        let battery = Viewport::new(
            DataBounds::new(x_min as f32, x_max as f32, BATTERY_AXIS_MIN, BATTERY_AXIS_MAX),
            self.bounds,
            self.padding,
        );
        Some((temperature, battery))
    }

    /// Draw both series and their axes
    pub fn draw<D>(&self, frozen: &FrozenSnapshot, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some((temperature, battery)) = self.viewports(frozen) else {
            return draw_placeholder(self.bounds, "No history yet", display);
        };

        draw_grid(temperature.plot_area(), display)?;

        let points = frozen.points();
        draw_series(
            &battery,
            points.iter().map(|p| (p.second as f32, p.battery_percent)),
            COLOR_BATTERY_SERIES,
            display,
        )?;
        draw_series(
            &temperature,
            points
                .iter()
                .map(|p| (p.second as f32, convert(p.temperature_c, self.unit))),
            COLOR_TEMPERATURE_SERIES,
            display,
        )?;

        self.draw_axes(&temperature, display)?;
        self.draw_battery_range(frozen, &temperature, display)
    }

    /// Battery min-max legend centered along the top of the plot
    fn draw_battery_range<D>(
        &self,
        frozen: &FrozenSnapshot,
        temperature: &Viewport,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let area = temperature.plot_area();
        let label = format_battery_range(&frozen.battery_stats());
        let center = Point::new(
            area.top_left.x + area.size.width as i32 / 2,
            area.top_left.y + 8,
        );
        let style = MonoTextStyle::new(&FONT_6X10, COLOR_BATTERY_SERIES);
        Text::with_alignment(&label, center, style, Alignment::Center).draw(display)?;
        Ok(())
    }

    fn draw_axes<D>(&self, temperature: &Viewport, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let area = temperature.plot_area();
        let bounds = temperature.data_bounds();
        let left = area.top_left.x;
        let right = area.top_left.x + area.size.width as i32;
        let top = area.top_left.y + 8;
        let bottom = area.top_left.y + area.size.height as i32;

        let label_style = MonoTextStyle::new(&FONT_6X10, LIGHT_GRAY);
        let temperature_style = MonoTextStyle::new(&FONT_6X10, COLOR_TEMPERATURE_SERIES);
        let battery_style = MonoTextStyle::new(&FONT_6X10, COLOR_BATTERY_SERIES);

        // Left axis: temperature in the display unit
        let suffix = self.unit.suffix();
        let y_max = format_axis_value(bounds.y_max, suffix);
        let y_min = format_axis_value(bounds.y_min, suffix);
        Text::with_alignment(&y_max, Point::new(left - 3, top), temperature_style, Alignment::Right)
            .draw(display)?;
        Text::with_alignment(&y_min, Point::new(left - 3, bottom), temperature_style, Alignment::Right)
            .draw(display)?;

        // Right axis: battery percent
        Text::with_alignment("100%", Point::new(right + 3, top), battery_style, Alignment::Left)
            .draw(display)?;
        Text::with_alignment("0%", Point::new(right + 3, bottom), battery_style, Alignment::Left)
            .draw(display)?;

        // X axis: elapsed session time
        let label_y = bottom + 10;
        let start = format_elapsed(bounds.x_min as u32);
        let end = format_elapsed(bounds.x_max as u32);
        Text::with_alignment(&start, Point::new(left, label_y), label_style, Alignment::Left)
            .draw(display)?;
        Text::with_alignment(&end, Point::new(right, label_y), label_style, Alignment::Right)
            .draw(display)?;

        Ok(())
    }
}

/// Draw a polyline through `values`, starting with a dot so a single point still shows
fn draw_series<D>(
    viewport: &Viewport,
    values: impl Iterator<Item = (f32, f32)>,
    color: Rgb565,
    display: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let stroke = PrimitiveStyle::with_stroke(color, SERIES_LINE_WIDTH_PX);
    let mut previous: Option<Point> = None;

    for (x, y) in values {
        let Some(point) = viewport.data_to_screen(x, y) else {
            continue;
        };
        match previous {
            Some(from) => Line::new(from, point).into_styled(stroke).draw(display)?,
            None => Circle::with_center(point, SERIES_LINE_WIDTH_PX + 1)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(display)?,
        }
        previous = Some(point);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;
    use crate::chart::test_support::{contains_color, contains_color_in, mock_display};
    use crate::storage::SnapshotBuffer;

    fn chart() -> SnapshotChart {
        SnapshotChart::new(
            Rectangle::new(Point::zero(), Size::new(64, 64)),
            TemperatureUnit::Celsius,
        )
        .with_padding(ViewportPadding::uniform(0))
    }

    fn frozen(points: &[(u32, f32, f32)]) -> FrozenSnapshot {
        let mut buffer = SnapshotBuffer::new();
        for &(second, temperature_c, battery_percent) in points {
            buffer.append(second, Some(temperature_c), Some(battery_percent));
        }
        buffer.freeze()
    }

    #[test]
    fn test_x_axis_spans_at_least_the_horizon() {
        assert_eq!(x_bounds(60, 180, 1200), (60, 1260));
        assert_eq!(x_bounds(0, 3000, 1200), (0, 3000));
        assert_eq!(x_bounds(u32::MAX - 10, u32::MAX, 1200), (u32::MAX - 10, u32::MAX));
    }

    #[test]
    fn test_battery_axis_is_fixed() {
        let frozen = frozen(&[(60, 20.0, 40.0), (120, 22.0, 45.0)]);
        let (temperature, battery) = chart().viewports(&frozen).unwrap();

        assert_eq!(battery.data_bounds().y_min, 0.0);
        assert_eq!(battery.data_bounds().y_max, 100.0);
        assert!(temperature.data_bounds().y_min < 20.0);
        assert!(temperature.data_bounds().y_max > 22.0);
        assert_eq!(temperature.data_bounds().x_max, 1260.0);

        // Full charge sits on the top edge
        assert_eq!(battery.data_to_screen(60.0, 100.0), Some(Point::new(0, 0)));
    }

    #[test]
    fn test_temperature_axis_follows_display_unit() {
        let frozen = frozen(&[(60, 0.0, 50.0), (120, 100.0, 50.0)]);
        let chart = chart();
        let fahrenheit = SnapshotChart::new(chart.bounds, TemperatureUnit::Fahrenheit)
            .with_padding(ViewportPadding::uniform(0));

        let (celsius, _) = chart.viewports(&frozen).unwrap();
        let (fahrenheit, _) = fahrenheit.viewports(&frozen).unwrap();
        assert!(celsius.data_bounds().y_max < 120.0);
        assert!(fahrenheit.data_bounds().y_max > 212.0);
    }

    #[test]
    fn test_draw_both_series() {
        let frozen = frozen(&[(60, 25.0, 80.0), (120, 26.0, 79.0), (180, 27.5, 78.0)]);
        let mut display: MockDisplay<Rgb565> = mock_display();
        chart().draw(&frozen, &mut display).unwrap();

        assert!(contains_color(&display, COLOR_TEMPERATURE_SERIES));
        assert!(contains_color(&display, COLOR_BATTERY_SERIES));
    }

    #[test]
    fn test_battery_range_legend_along_top() {
        // Low charge keeps the battery series near the bottom edge
        let frozen = frozen(&[(60, 25.0, 10.0), (120, 26.0, 8.0)]);
        let mut display: MockDisplay<Rgb565> = mock_display();
        chart().draw(&frozen, &mut display).unwrap();

        let legend = Rectangle::new(Point::zero(), Size::new(64, 11));
        assert!(contains_color_in(&display, legend, COLOR_BATTERY_SERIES));
    }

    #[test]
    fn test_single_point_still_draws() {
        let frozen = frozen(&[(60, 25.0, 80.0)]);
        let mut display: MockDisplay<Rgb565> = mock_display();
        chart().draw(&frozen, &mut display).unwrap();

        assert!(contains_color(&display, COLOR_TEMPERATURE_SERIES));
    }

    #[test]
    fn test_empty_snapshot_draws_placeholder() {
        let mut display: MockDisplay<Rgb565> = mock_display();
        chart().draw(&FrozenSnapshot::default(), &mut display).unwrap();

        assert!(contains_color(&display, LIGHT_GRAY));
        assert!(!contains_color(&display, COLOR_BATTERY_SERIES));
    }
}
