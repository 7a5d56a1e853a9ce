//! Chart rendering for the live and snapshot views
//!
//! The renderer only reads: it takes a [`Session`] borrow, resolves the
//! current [`DisplaySource`] and draws a header strip, the chart body and,
//! in snapshot mode, a footer with summary statistics.
//!
//! ```ignore
//! let renderer = ChartRenderer::new(&config);
//! session.lock(|cell| renderer.render(&cell.borrow(), &mut display))?;
//! ```

pub mod constants;
pub mod labels;
pub mod live;
pub mod snapshot;
pub mod viewport;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::iso_8859_1::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};

use crate::config::Config;
use crate::session::Session;
use crate::storage::{FrozenSnapshot, SNAPSHOT_DEFAULT_HORIZON_SECS};
use crate::units::{TemperatureUnit, convert, display_color};
use crate::view::DisplaySource;

use constants::{
    COLOR_BACKGROUND, COLOR_FOREGROUND, FAINT_GRAY, FOOTER_HEIGHT_PX, GRID_LINE_COUNT,
    HEADER_HEIGHT_PX, LIGHT_GRAY, WHITE,
};
use labels::{Label, format_battery, format_temperature};

pub use live::LiveChart;
pub use snapshot::SnapshotChart;
pub use viewport::{DataBounds, Viewport, ViewportPadding};

/// Draws the whole screen for a session
#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    unit: TemperatureUnit,
    horizon_secs: u32,
    padding: ViewportPadding,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self {
            unit: TemperatureUnit::default(),
            horizon_secs: SNAPSHOT_DEFAULT_HORIZON_SECS,
            padding: ViewportPadding::default(),
        }
    }
}

impl ChartRenderer {
    /// Renderer using the unit and horizon from `config`
    pub fn new(config: &Config) -> Self {
        Self {
            unit: config.unit,
            horizon_secs: config.snapshot_horizon_secs,
            padding: ViewportPadding::default(),
        }
    }

    /// Override the chart body padding
    pub fn with_padding(mut self, padding: ViewportPadding) -> Self {
        self.padding = padding;
        self
    }

    /// Change the display unit
    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
    }

    /// Current display unit
    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Draw header, body and footer for the session's current view
    pub fn render<D>(&self, session: &Session, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let screen = display.bounding_box();
        display.clear(COLOR_BACKGROUND)?;

        let header = Rectangle::new(
            screen.top_left,
            Size::new(screen.size.width, HEADER_HEIGHT_PX),
        );
        self.draw_header(session, header, display)?;

        let source = session.display_source();
        let footer_height = match source {
            DisplaySource::Live(_) => 0,
            DisplaySource::Snapshot(_) => FOOTER_HEIGHT_PX,
        };
        let body = Rectangle::new(
            screen.top_left + Point::new(0, HEADER_HEIGHT_PX as i32),
            Size::new(
                screen.size.width,
                screen
                    .size
                    .height
                    .saturating_sub(HEADER_HEIGHT_PX + footer_height),
            ),
        );

        match source {
            DisplaySource::Live(buffer) => LiveChart::new(body, self.unit)
                .with_padding(self.padding)
                .draw(buffer, display),
            DisplaySource::Snapshot(frozen) => {
                SnapshotChart::new(body, self.unit)
                    .with_horizon(self.horizon_secs)
                    .with_padding(self.padding)
                    .draw(frozen, display)?;

                let footer = Rectangle::new(
                    body.top_left + Point::new(0, body.size.height as i32),
                    Size::new(screen.size.width, FOOTER_HEIGHT_PX),
                );
                self.draw_footer(frozen, footer, display)
            }
        }
    }

    fn draw_header<D>(
        &self,
        session: &Session,
        area: Rectangle,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        area.into_styled(PrimitiveStyle::with_fill(COLOR_FOREGROUND))
            .draw(display)?;

        let latest = session.latest();
        let temperature = format_temperature(latest.temperature_c, self.unit);
        let temperature_color = latest
            .temperature_c
            .map(|c| display_color(convert(c, self.unit), self.unit))
            .unwrap_or(LIGHT_GRAY);

        let left = area.top_left.x + 4;
        let right = area.top_left.x + area.size.width as i32 - 4;
        let center = area.top_left.x + area.size.width as i32 / 2;
        let baseline = area.top_left.y + area.size.height as i32 - 8;

        Text::with_alignment(
            &temperature,
            Point::new(left, area.top_left.y + 20),
            MonoTextStyle::new(&FONT_10X20, temperature_color),
            Alignment::Left,
        )
        .draw(display)?;

        let battery = format_battery(latest.battery_percent, latest.charging);
        Text::with_alignment(
            &battery,
            Point::new(center, baseline),
            MonoTextStyle::new(&FONT_6X10, WHITE),
            Alignment::Center,
        )
        .draw(display)?;

        Text::with_alignment(
            session.view().kind().label(),
            Point::new(right, baseline),
            MonoTextStyle::new(&FONT_6X10, LIGHT_GRAY),
            Alignment::Right,
        )
        .draw(display)?;

        Ok(())
    }

    fn draw_footer<D>(
        &self,
        frozen: &FrozenSnapshot,
        area: Rectangle,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        area.into_styled(PrimitiveStyle::with_fill(COLOR_FOREGROUND))
            .draw(display)?;

        let stats = frozen.temperature_stats();
        let (min, avg, max) = if stats.is_empty() {
            (None, None, None)
        } else {
            (Some(stats.min), Some(stats.avg), Some(stats.max))
        };

        let style = MonoTextStyle::new(&FONT_6X10, WHITE);
        let baseline = area.top_left.y + area.size.height as i32 - 6;
        let width = area.size.width as i32;
        let columns = [
            ("MIN", min, Alignment::Left, area.top_left.x + 4),
            ("AVG", avg, Alignment::Center, area.top_left.x + width / 2),
            ("MAX", max, Alignment::Right, area.top_left.x + width - 4),
        ];

        for (name, value, alignment, x) in columns {
            let text = stat_label(name, value, self.unit);
            Text::with_alignment(&text, Point::new(x, baseline), style, alignment)
                .draw(display)?;
        }

        Ok(())
    }
}

/// "MIN 20.0°C" style footer entry
fn stat_label(name: &str, celsius: Option<f32>, unit: TemperatureUnit) -> Label {
    let mut label = Label::new();
    let _ = label.push_str(name);
    let _ = label.push(' ');
    let _ = label.push_str(&format_temperature(celsius, unit));
    label
}

/// Evenly spaced horizontal grid lines inside `area`
pub(crate) fn draw_grid<D>(area: Rectangle, display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyle::with_stroke(FAINT_GRAY, 1);
    let left = area.top_left.x;
    let right = area.top_left.x + area.size.width as i32 - 1;

    for i in 1..=GRID_LINE_COUNT {
        let y = area.top_left.y + (area.size.height * i / (GRID_LINE_COUNT + 1)) as i32;
        Line::new(Point::new(left, y), Point::new(right, y))
            .into_styled(style)
            .draw(display)?;
    }
    Ok(())
}

/// Centered hint shown while a chart has nothing to plot
pub(crate) fn draw_placeholder<D>(
    area: Rectangle,
    text: &str,
    display: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Text::with_alignment(
        text,
        area.center(),
        MonoTextStyle::new(&FONT_6X10, LIGHT_GRAY),
        Alignment::Center,
    )
    .draw(display)?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use embedded_graphics::mock_display::MockDisplay;

    use super::constants::COLOR_TEMPERATURE_SERIES;
    use super::test_support::{contains_color, contains_color_in, mock_display};
    use super::*;
    use crate::sensors::LatestReading;

    fn renderer() -> ChartRenderer {
        ChartRenderer::default().with_padding(ViewportPadding::uniform(0))
    }

    fn header_area() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(64, HEADER_HEIGHT_PX))
    }

    fn hot_session() -> Box<Session> {
        let mut session = Box::new(Session::new());
        session.apply_reading(LatestReading {
            temperature_c: Some(40.5),
            battery_percent: Some(64.0),
            charging: Some(true),
        });
        session.live_tick();
        session
    }

    #[test]
    fn test_empty_session_shows_placeholders() {
        let session = Box::new(Session::new());
        let mut display: MockDisplay<Rgb565> = mock_display();
        renderer().render(&session, &mut display).unwrap();

        assert!(contains_color_in(&display, header_area(), LIGHT_GRAY));
        assert!(contains_color(&display, COLOR_BACKGROUND));
    }

    #[test]
    fn test_header_uses_band_color() {
        let session = hot_session();
        let mut display: MockDisplay<Rgb565> = mock_display();
        renderer().render(&session, &mut display).unwrap();

        assert!(contains_color_in(&display, header_area(), Rgb565::CSS_ORANGE_RED));
    }

    #[test]
    fn test_band_is_unit_independent() {
        let session = hot_session();
        let mut renderer = renderer();
        renderer.set_unit(TemperatureUnit::Kelvin);

        let mut display: MockDisplay<Rgb565> = mock_display();
        renderer.render(&session, &mut display).unwrap();

        assert!(contains_color_in(&display, header_area(), Rgb565::CSS_ORANGE_RED));
    }

    #[test]
    fn test_snapshot_view_draws_series_and_footer() {
        let mut session = hot_session();
        session.snapshot_tick();
        session.live_tick();
        session.snapshot_tick();
        session.show_snapshot();

        let mut display: MockDisplay<Rgb565> = mock_display();
        renderer().render(&session, &mut display).unwrap();

        let footer = Rectangle::new(
            Point::new(0, 64 - FOOTER_HEIGHT_PX as i32),
            Size::new(64, FOOTER_HEIGHT_PX),
        );
        assert!(contains_color(&display, COLOR_TEMPERATURE_SERIES));
        assert!(contains_color_in(&display, footer, WHITE));
    }

    #[test]
    fn test_stat_label() {
        assert_eq!(
            stat_label("MIN", Some(20.0), TemperatureUnit::Celsius).as_str(),
            "MIN 20.0°C"
        );
        assert_eq!(
            stat_label("MAX", None, TemperatureUnit::Fahrenheit).as_str(),
            "MAX --°F"
        );
    }

    #[test]
    fn test_renderer_follows_config() {
        let config = Config::with_unit(TemperatureUnit::Fahrenheit);
        let renderer = ChartRenderer::new(&config);
        assert_eq!(renderer.unit(), TemperatureUnit::Fahrenheit);
        assert_eq!(renderer.horizon_secs, config.snapshot_horizon_secs);
    }
}
