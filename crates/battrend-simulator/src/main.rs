//! Desktop simulator for the battrend battery temperature display.
//!
//! Feeds synthetic battery payloads through battrend-core and renders both
//! chart views with `embedded-graphics-simulator`.
//!
//! Both modes drive the session through `Sampler::run`. By default the
//! simulator runs headless: it fast-forwards a simulated clock, then writes
//! `live.png` and `snapshot.png`.
//!
//! ```text
//! battrend-simulator [unit] [seconds] [out_dir]
//! ```
//!
//! With the `window` feature it opens an SDL2 window instead and runs in
//! real time.
//!
//! # Key bindings (window)
//!
//! | Key       | Action                       |
//! |-----------|------------------------------|
//! | Space / T | Toggle live / snapshot view  |
//! | U         | Cycle temperature unit       |
//! | Q         | Quit                         |

use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use log::{error, info, warn};

use battrend_core::chart::ChartRenderer;
use battrend_core::config::Config;
use battrend_core::sampler::Interval;
use battrend_core::sensors::{BatteryMonitor, BatteryPayload, ChargeStatus, SensorError};
use battrend_core::session::{self, Session, SharedSession};
use battrend_core::units::TemperatureUnit;

#[cfg(not(feature = "window"))]
mod fast_forward;

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

const DISPLAY_WIDTH_PX: u32 = 320;
const DISPLAY_HEIGHT_PX: u32 = 240;

/// Pixel scale factor for the window and exported images.
const WINDOW_SCALE: u32 = 2;

/// Simulated seconds to run headless when none are given (two hours).
const DEFAULT_HEADLESS_SECS: u32 = 2 * 60 * 60;

/// File holding the postcard-encoded [`Config`] inside the output directory.
const SETTINGS_FILE: &str = "battrend-settings.bin";

static SESSION: SharedSession = session::shared(Session::new());

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Generates platform-style battery payloads that vary over time.
///
/// The battery discharges under a load that warms it up, then charges back
/// to full. Every few minutes a payload arrives with a zero scale, the way
/// a flaky platform report would.
struct MockBatteryGenerator {
    /// Battery level on a 0-1000 scale.
    level: i32,
    charging: bool,
    elapsed_secs: u32,
}

impl MockBatteryGenerator {
    const SCALE: i32 = 1000;
    const GLITCH_PERIOD_SECS: u32 = 7 * 60;

    fn new() -> Self {
        Self {
            level: 900,
            charging: false,
            elapsed_secs: 0,
        }
    }

    /// Report the current state, then advance one second.
    fn next_payload(&mut self) -> BatteryPayload {
        let t = self.elapsed_secs as f64;

        if self.charging {
            self.level += 2;
            if self.level >= Self::SCALE {
                self.level = Self::SCALE;
                self.charging = false;
            }
        } else {
            self.level -= 1;
            if self.level <= 150 {
                self.charging = true;
            }
        }

        // 24-45 °C: heat from the load plus a slow ambient swing
        let load_heat = if self.charging { 9.0 } else { 6.0 };
        let celsius = 28.0 + load_heat * (t / 600.0).sin().abs() + 2.5 * (t / 97.0).cos();

        let status = match (self.charging, self.level) {
            (_, level) if level >= Self::SCALE => ChargeStatus::Full,
            (true, _) => ChargeStatus::Charging,
            (false, _) => ChargeStatus::Discharging,
        };

        let glitch = self.elapsed_secs > 0 && self.elapsed_secs % Self::GLITCH_PERIOD_SECS == 0;
        let scale = if glitch { 0 } else { Self::SCALE };
        self.elapsed_secs += 1;

        BatteryPayload {
            level: Some(self.level),
            scale: Some(scale),
            temperature_tenths: Some((celsius * 10.0).round() as i32),
            status: Some(status.code()),
        }
    }
}

/// [`BatteryMonitor`] that reports a generated payload on every tick of its
/// interval.
struct GeneratorMonitor<I> {
    generator: MockBatteryGenerator,
    interval: I,
    subscribed: bool,
}

impl<I: Interval> GeneratorMonitor<I> {
    fn new(interval: I) -> Self {
        Self {
            generator: MockBatteryGenerator::new(),
            interval,
            subscribed: false,
        }
    }
}

impl<I: Interval> BatteryMonitor for GeneratorMonitor<I> {
    fn subscribe(&mut self) -> Result<(), SensorError> {
        self.subscribed = true;
        info!("Mock battery monitor subscribed");
        Ok(())
    }

    fn unsubscribe(&mut self) -> Result<(), SensorError> {
        if !self.subscribed {
            return Err(SensorError::AlreadyUnsubscribed);
        }
        self.subscribed = false;
        info!("Mock battery monitor unsubscribed");
        Ok(())
    }

    async fn next_payload(&mut self) -> BatteryPayload {
        self.interval.tick().await;
        self.generator.next_payload()
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Load the settings slot, falling back to defaults when absent or corrupt.
fn load_config(path: &Path) -> Config {
    match fs::read(path) {
        Ok(bytes) => match Config::from_bytes(&bytes) {
            Ok(config) => {
                info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring settings in {}: {}", path.display(), e);
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

fn save_config(path: &Path, config: &Config) -> io::Result<()> {
    let bytes = config
        .to_bytes()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    fs::write(path, bytes)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(renderer: &ChartRenderer, display: &mut SimulatorDisplay<Rgb565>) {
    let result = SESSION.lock(|cell| renderer.render(&cell.borrow(), display));
    if let Err(e) = result {
        error!("Draw error: {:?}", e);
    }
}

// ---------------------------------------------------------------------------
// Headless mode
// ---------------------------------------------------------------------------

#[cfg(not(feature = "window"))]
fn run(config: Config, args: &[String], out_dir: &Path) -> Result<(), Box<dyn Error>> {
    let seconds = match args.get(1) {
        Some(arg) => arg.parse::<u32>()?,
        None => DEFAULT_HEADLESS_SECS,
    };
    fast_forward::fast_forward(&SESSION, &config, seconds);

    let (live_len, snapshot_len) = SESSION.lock(|cell| {
        let session = cell.borrow();
        (session.live().len(), session.snapshot().len())
    });
    info!(
        "Session at {} live samples, {} snapshot points",
        live_len, snapshot_len
    );

    let renderer = ChartRenderer::new(&config);
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut display =
        SimulatorDisplay::<Rgb565>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));

    render(&renderer, &mut display);
    let live_path = out_dir.join("live.png");
    display
        .to_rgb_output_image(&output_settings)
        .save_png(&live_path)?;
    info!("Wrote {}", live_path.display());

    SESSION.lock(|cell| cell.borrow_mut().show_snapshot());
    render(&renderer, &mut display);
    let snapshot_path = out_dir.join("snapshot.png");
    display
        .to_rgb_output_image(&output_settings)
        .save_png(&snapshot_path)?;
    info!("Wrote {}", snapshot_path.display());

    Ok(())
}

// ---------------------------------------------------------------------------
// Window mode
// ---------------------------------------------------------------------------

#[cfg(feature = "window")]
fn run(mut config: Config, _args: &[String], out_dir: &Path) -> Result<(), Box<dyn Error>> {
    use std::pin::pin;
    use std::time::{Duration, Instant};

    use battrend_core::sampler::Sampler;
    use embassy_futures::{block_on, poll_once};
    use embassy_time::Ticker;
    use embedded_graphics_simulator::{SimulatorEvent, Window, sdl2::Keycode};

    /// Target frame duration (~30 FPS).
    const FRAME_DURATION: Duration = Duration::from_millis(33);

    info!("Keys: Space/T=toggle view  U=cycle unit  Q=quit");

    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Battrend Simulator", &output_settings);
    let mut display =
        SimulatorDisplay::<Rgb565>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));

    let mut renderer = ChartRenderer::new(&config);

    // Sampling runs on the host time driver and is polled once per frame
    let sampler = Sampler::new();
    let mut monitor = GeneratorMonitor::new(Ticker::every(config.live_period()));
    let mut sampling = pin!(sampler.run(
        &SESSION,
        Ticker::every(config.live_period()),
        Ticker::every(config.snapshot_period()),
        &mut monitor,
    ));
    let mut last_clock = None;

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    render(&renderer, &mut display);
    window.update(&display);
    let mut needs_redraw = false;

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::Space | Keycode::T => {
                        let kind = SESSION.lock(|cell| cell.borrow_mut().toggle_view());
                        info!("View: {}", kind.label());
                        needs_redraw = true;
                    }
                    Keycode::U => {
                        config.unit = config.unit.next();
                        renderer.set_unit(config.unit);
                        save_config(&out_dir.join(SETTINGS_FILE), &config)?;
                        info!("Unit: {:?}", config.unit);
                        needs_redraw = true;
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        let _ = poll_once(sampling.as_mut());
        let clock = SESSION.lock(|cell| cell.borrow().clock());
        if last_clock != Some(clock) {
            last_clock = Some(clock);
            needs_redraw = true;
        }

        if needs_redraw {
            render(&renderer, &mut display);
            needs_redraw = false;
        }
        window.update(&display);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    sampler.stop();
    block_on(sampling);
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    info!("Starting battrend simulator");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let out_dir = args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&out_dir)?;

    let settings_path = out_dir.join(SETTINGS_FILE);
    let mut config = load_config(&settings_path);
    if let Some(name) = args.first() {
        match TemperatureUnit::from_name(name) {
            Some(unit) => config.unit = unit,
            None => warn!("Unknown unit {:?}, keeping {:?}", name, config.unit),
        }
    }
    save_config(&settings_path, &config)?;
    info!(
        "Display: {}×{} in {:?}",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, config.unit
    );

    run(config, &args, &out_dir)?;

    info!("Simulator exiting");
    Ok(())
}
