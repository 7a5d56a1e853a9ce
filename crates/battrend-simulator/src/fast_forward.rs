//! Headless fast-forward on a simulated clock
//!
//! Runs [`Sampler::run`] exactly as the window does, but every interval
//! waits on a shared [`SimulatedClock`] instead of the host time driver. The
//! clock jumps one live period at a time, so hours of session pass in a
//! fraction of a second and tick ordering is deterministic.

use core::cell::Cell;

use embassy_futures::join::join;
use embassy_futures::{block_on, yield_now};
use embassy_time::Duration;
use log::info;

use battrend_core::config::Config;
use battrend_core::sampler::{Interval, Sampler};
use battrend_core::session::SharedSession;

use crate::GeneratorMonitor;

/// Milliseconds since the start of the simulated session
#[derive(Debug, Default)]
pub struct SimulatedClock {
    now_ms: Cell<u64>,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    /// Step the clock toward `until_ms` by `step_ms`, yielding before each
    /// step so every interval sees each instant, then stop `sampler`.
    pub async fn run_until(&self, until_ms: u64, step_ms: u64, sampler: &Sampler) {
        let step_ms = step_ms.max(1);
        while self.now_ms() < until_ms {
            yield_now().await;
            let next = self.now_ms().saturating_add(step_ms).min(until_ms);
            self.now_ms.set(next);
        }

        // One more pass so ticks due at `until_ms` still fire
        yield_now().await;
        sampler.stop();
    }
}

/// Periodic [`Interval`] on a [`SimulatedClock`]
///
/// A late tick fires immediately and keeps the original schedule, the same
/// way `embassy_time::Ticker` catches up.
pub struct SimulatedTicker<'a> {
    clock: &'a SimulatedClock,
    period_ms: u64,
    next_ms: u64,
}

impl<'a> SimulatedTicker<'a> {
    /// First tick one period from now
    pub fn every(clock: &'a SimulatedClock, period: Duration) -> Self {
        let period_ms = period.as_millis().max(1);
        Self {
            clock,
            period_ms,
            next_ms: clock.now_ms() + period_ms,
        }
    }

    /// First tick right away, then once per period
    pub fn starting_now(clock: &'a SimulatedClock, period: Duration) -> Self {
        Self {
            clock,
            period_ms: period.as_millis().max(1),
            next_ms: clock.now_ms(),
        }
    }
}

impl Interval for SimulatedTicker<'_> {
    async fn tick(&mut self) {
        while self.clock.now_ms() < self.next_ms {
            yield_now().await;
        }
        self.next_ms += self.period_ms;
    }
}

/// Run `seconds` of simulated session time into `session`
///
/// The generator reports once per live period, starting at subscription.
/// Live and snapshot ticks keep their own schedules from `config`.
pub fn fast_forward(session: &SharedSession, config: &Config, seconds: u32) {
    let clock = SimulatedClock::new();
    let sampler = Sampler::new();
    let mut monitor = GeneratorMonitor::new(SimulatedTicker::starting_now(
        &clock,
        config.live_period(),
    ));

    let until_ms = u64::from(seconds) * 1000;
    info!("Fast-forwarding {} simulated seconds", seconds);

    block_on(join(
        sampler.run(
            session,
            SimulatedTicker::every(&clock, config.live_period()),
            SimulatedTicker::every(&clock, config.snapshot_period()),
            &mut monitor,
        ),
        clock.run_until(until_ms, config.live_period().as_millis(), &sampler),
    ));
}
