//! Session context: latest reading, session clock, both histories and the view
//!
//! Every handler here is synchronous and runs to completion. The sampler wraps
//! the session in a blocking mutex so a tick's read-then-append is atomic with
//! respect to every other handler.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{debug, info, warn};

use crate::sensors::{BatteryPayload, LatestReading};
use crate::storage::{AppendOutcome, LiveBuffer, SkipReason, SnapshotBuffer};
use crate::view::{DisplaySource, ViewKind, ViewMode};

/// Session shared between the sampling loops and the UI
pub type SharedSession = Mutex<CriticalSectionRawMutex, RefCell<Session>>;

/// Wrap a session for sharing
pub const fn shared(session: Session) -> SharedSession {
    Mutex::new(RefCell::new(session))
}

/// Everything the two chart views need, owned in one place
#[derive(Debug, Default)]
pub struct Session {
    latest: LatestReading,
    /// Seconds elapsed since session start, advanced only by the live tick
    clock: u32,
    live: LiveBuffer,
    snapshot: SnapshotBuffer,
    view: ViewMode,
}

impl Session {
    /// Create an empty session at second zero
    pub const fn new() -> Self {
        Self {
            latest: LatestReading::EMPTY,
            clock: 0,
            live: LiveBuffer::new(),
            snapshot: SnapshotBuffer::new(),
            view: ViewMode::Live,
        }
    }

    /// Replace the latest reading with a new sensor report
    ///
    /// The very first temperature seeds the live chart at second zero so a
    /// bar shows up before the first live tick.
    pub fn apply_reading(&mut self, reading: LatestReading) {
        self.latest = reading;

        if let Some(temperature_c) = reading.temperature_c {
            if self.live.is_empty() {
                self.live.append(self.clock, temperature_c);
                info!(
                    "First battery temperature {:.1}°C seeded at second {}",
                    temperature_c, self.clock
                );
            }
        }
    }

    /// Decode a platform payload and apply it
    pub fn apply_payload(&mut self, payload: &BatteryPayload) {
        self.apply_reading(payload.decode());
    }

    /// Once-per-second tick feeding the live chart
    pub fn live_tick(&mut self) -> AppendOutcome {
        let Some(temperature_c) = self.latest.temperature_c else {
            return AppendOutcome::Skipped(SkipReason::MissingTemperature);
        };

        self.clock += 1;
        let outcome = self.live.append(self.clock, temperature_c);
        match outcome {
            AppendOutcome::Appended { evicted } => debug!(
                "Live sample {:.1}°C at {}s ({} evicted)",
                temperature_c, self.clock, evicted
            ),
            AppendOutcome::Skipped(reason) => warn!("Live sample skipped: {:?}", reason),
        }
        outcome
    }

    /// Once-per-minute tick feeding the snapshot history
    pub fn snapshot_tick(&mut self) -> AppendOutcome {
        let outcome = self.snapshot.append(
            self.clock,
            self.latest.temperature_c,
            self.latest.battery_percent,
        );
        match outcome {
            AppendOutcome::Appended { evicted } => debug!(
                "Snapshot point at {}s ({} stored, {} evicted)",
                self.clock,
                self.snapshot.len(),
                evicted
            ),
            AppendOutcome::Skipped(SkipReason::NotAdvancing { newest, offered }) => warn!(
                "Snapshot point skipped: clock at {}s has not passed {}s",
                offered, newest
            ),
            AppendOutcome::Skipped(reason) => debug!("Snapshot point skipped: {:?}", reason),
        }
        outcome
    }

    /// Flip between live and snapshot view
    pub fn toggle_view(&mut self) -> ViewKind {
        self.view.toggle(&self.snapshot)
    }

    /// Force live view
    pub fn show_live(&mut self) {
        self.view.enter_live();
    }

    /// Force snapshot view with a fresh copy of the history
    pub fn show_snapshot(&mut self) {
        self.view.enter_snapshot(&self.snapshot);
    }

    /// What the chart should draw right now
    pub fn display_source(&self) -> DisplaySource<'_> {
        DisplaySource::new(&self.view, &self.live)
    }

    /// Most recent sensor values
    pub fn latest(&self) -> &LatestReading {
        &self.latest
    }

    /// Seconds elapsed on the session clock
    pub fn clock(&self) -> u32 {
        self.clock
    }

    /// Live history
    pub fn live(&self) -> &LiveBuffer {
        &self.live
    }

    /// Snapshot history
    pub fn snapshot(&self) -> &SnapshotBuffer {
        &self.snapshot
    }

    /// Current view mode
    pub fn view(&self) -> &ViewMode {
        &self.view
    }
}
