//! Dual-rate sampling loops
//!
//! Three loops share one [`SharedSession`]:
//!
//! - the live loop, every second, copies the latest temperature into the
//!   live history and advances the session clock;
//! - the snapshot loop, every minute, copies temperature and battery charge
//!   into the snapshot history;
//! - the sensor loop applies battery payloads as they arrive.
//!
//! All three are joined into a single future and raced against a stop
//! signal, so they interleave on one executor and never run in parallel.
//! Each loop awaits its own interval between handlers, so a tick can never
//! overlap itself.
//!
//! ```rust,ignore
//! static SESSION: SharedSession = session::shared(Session::new());
//! static SAMPLER: Sampler = Sampler::new();
//!
//! let config = Config::default();
//! SAMPLER
//!     .run(
//!         &SESSION,
//!         Ticker::every(config.live_period()),
//!         Ticker::every(config.snapshot_period()),
//!         &mut monitor,
//!     )
//!     .await;
//! ```

use core::future::Future;

use embassy_futures::join::join3;
use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Ticker;
use log::{info, warn};

use crate::sensors::{self, BatteryMonitor};
use crate::session::SharedSession;

/// A periodic wake-up
pub trait Interval {
    /// Wait until the next period boundary
    fn tick(&mut self) -> impl Future<Output = ()>;
}

impl Interval for Ticker {
    async fn tick(&mut self) {
        self.next().await
    }
}

/// Owns the stop signal for one sampling session
pub struct Sampler {
    stop: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    /// Create a sampler that is not yet stopped
    pub const fn new() -> Self {
        Self {
            stop: Signal::new(),
        }
    }

    /// Ask a running [`Sampler::run`] to return
    ///
    /// Safe to call before `run` starts; the request is kept until consumed.
    pub fn stop(&self) {
        self.stop.signal(());
    }

    /// Run all sampling loops until [`Sampler::stop`] is called
    ///
    /// The monitor is subscribed on entry and torn down on exit. A failed
    /// subscription still lets the ticks run on whatever reading is already
    /// in the session.
    pub async fn run<L, S, M>(
        &self,
        session: &SharedSession,
        live_interval: L,
        snapshot_interval: S,
        monitor: &mut M,
    ) where
        L: Interval,
        S: Interval,
        M: BatteryMonitor,
    {
        if let Err(e) = monitor.subscribe() {
            warn!("Battery monitor subscription failed: {}", e);
        }
        info!("Sampling started");

        let loops = join3(
            live_loop(session, live_interval),
            snapshot_loop(session, snapshot_interval),
            sensor_loop(session, monitor),
        );

        match select(loops, self.stop.wait()).await {
            Either::First(_) => warn!("Sampling loops exited unexpectedly"),
            Either::Second(()) => info!("Sampling stopped"),
        }

        sensors::teardown(monitor);
    }
}

/// Once-per-second live tick
pub async fn live_loop<L: Interval>(session: &SharedSession, mut interval: L) {
    loop {
        interval.tick().await;
        session.lock(|cell| cell.borrow_mut().live_tick());
    }
}

/// Once-per-minute snapshot tick
pub async fn snapshot_loop<S: Interval>(session: &SharedSession, mut interval: S) {
    loop {
        interval.tick().await;
        session.lock(|cell| cell.borrow_mut().snapshot_tick());
    }
}

/// Apply battery payloads as they arrive
pub async fn sensor_loop<M: BatteryMonitor>(session: &SharedSession, monitor: &mut M) {
    loop {
        let payload = monitor.next_payload().await;
        session.lock(|cell| cell.borrow_mut().apply_payload(&payload));
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::vec::Vec;

    use embassy_futures::{block_on, yield_now};

    use super::*;
    use crate::sensors::{BatteryPayload, LatestReading, SensorError};
    use crate::session::{self, Session};

    /// Fires `remaining` ticks immediately, then asks the sampler to stop and
    /// never ticks again.
    struct BurstInterval<'a> {
        remaining: usize,
        sampler: &'a Sampler,
    }

    impl Interval for BurstInterval<'_> {
        async fn tick(&mut self) {
            if self.remaining == 0 {
                self.sampler.stop();
                core::future::pending::<()>().await;
            }
            self.remaining -= 1;
        }
    }

    /// Yields to the other loops `pace` times before each of its
    /// `remaining` ticks, then idles. Only an interval with `stops` set asks
    /// the sampler to stop.
    struct PacedInterval<'a> {
        pace: usize,
        remaining: usize,
        stops: Option<&'a Sampler>,
    }

    impl Interval for PacedInterval<'_> {
        async fn tick(&mut self) {
            if self.remaining == 0 {
                if let Some(sampler) = self.stops {
                    sampler.stop();
                }
                core::future::pending::<()>().await;
            }
            for _ in 0..self.pace {
                yield_now().await;
            }
            self.remaining -= 1;
        }
    }

    struct IdleInterval;

    impl Interval for IdleInterval {
        async fn tick(&mut self) {
            core::future::pending::<()>().await
        }
    }

    struct ScriptedMonitor {
        payloads: VecDeque<BatteryPayload>,
        subscribed: bool,
        unsubscribed: bool,
    }

    impl ScriptedMonitor {
        fn new(payloads: impl IntoIterator<Item = BatteryPayload>) -> Self {
            Self {
                payloads: payloads.into_iter().collect(),
                subscribed: false,
                unsubscribed: false,
            }
        }
    }

    impl BatteryMonitor for ScriptedMonitor {
        fn subscribe(&mut self) -> Result<(), SensorError> {
            self.subscribed = true;
            Ok(())
        }

        fn unsubscribe(&mut self) -> Result<(), SensorError> {
            if !self.subscribed {
                return Err(SensorError::AlreadyUnsubscribed);
            }
            self.subscribed = false;
            self.unsubscribed = true;
            Ok(())
        }

        async fn next_payload(&mut self) -> BatteryPayload {
            match self.payloads.pop_front() {
                Some(payload) => payload,
                None => core::future::pending().await,
            }
        }
    }

    fn warm_session() -> SharedSession {
        let mut session = Session::new();
        session.apply_reading(LatestReading {
            temperature_c: Some(31.5),
            battery_percent: Some(64.0),
            charging: Some(true),
        });
        session::shared(session)
    }

    #[test]
    fn test_live_loop_runs_until_stopped() {
        let session = warm_session();
        let sampler = Sampler::new();
        let mut monitor = ScriptedMonitor::new([]);

        block_on(sampler.run(
            &session,
            BurstInterval {
                remaining: 61,
                sampler: &sampler,
            },
            IdleInterval,
            &mut monitor,
        ));

        session.lock(|cell| {
            let session = cell.borrow();
            assert_eq!(session.clock(), 61);
            assert_eq!(session.live().len(), 60);
            assert!(session.snapshot().is_empty());
        });
        assert!(monitor.unsubscribed);
    }

    #[test]
    fn test_snapshot_loop_appends_per_tick() {
        let session = warm_session();
        let sampler = Sampler::new();
        let mut monitor = ScriptedMonitor::new([]);

        block_on(sampler.run(
            &session,
            IdleInterval,
            BurstInterval {
                remaining: 1,
                sampler: &sampler,
            },
            &mut monitor,
        ));

        let points = session.lock(|cell| cell.borrow().snapshot().len());
        assert_eq!(points, 1);
    }

    #[test]
    fn test_sensor_loop_applies_payloads() {
        let session = session::shared(Session::new());
        let sampler = Sampler::new();
        let mut monitor = ScriptedMonitor::new([
            BatteryPayload {
                level: Some(50),
                scale: Some(100),
                temperature_tenths: Some(250),
                status: Some(2),
            },
            BatteryPayload {
                level: Some(49),
                scale: Some(100),
                temperature_tenths: Some(262),
                status: Some(3),
            },
        ]);

        // Stop is already pending, so the loops get exactly one poll
        sampler.stop();
        block_on(sampler.run(&session, IdleInterval, IdleInterval, &mut monitor));

        session.lock(|cell| {
            let session = cell.borrow();
            assert_eq!(session.latest().temperature_c, Some(26.2));
            assert_eq!(session.latest().charging, Some(false));
            assert_eq!(session.live().len(), 1);
            assert_eq!(session.live().latest().map(|s| s.temperature_c), Some(25.0));
        });
    }

    #[test]
    fn test_live_and_snapshot_loops_interleave() {
        let session = warm_session();
        let sampler = Sampler::new();
        let mut monitor = ScriptedMonitor::new([]);

        block_on(sampler.run(
            &session,
            PacedInterval {
                pace: 1,
                remaining: 120,
                stops: Some(&sampler),
            },
            PacedInterval {
                pace: 50,
                remaining: 2,
                stops: None,
            },
            &mut monitor,
        ));

        session.lock(|cell| {
            let session = cell.borrow();
            assert_eq!(session.clock(), 120);

            let live: Vec<u32> = session.live().iter().map(|s| s.second).collect();
            assert_eq!(live.len(), 60);
            assert_eq!(live.last(), Some(&120));
            assert!(live.windows(2).all(|w| w[1] == w[0] + 1));

            // Both snapshot ticks landed mid-run, stamped with the advancing clock
            let snapshot: Vec<u32> = session.snapshot().iter().map(|p| p.second).collect();
            assert_eq!(snapshot.len(), 2);
            assert!(snapshot[0] > 0);
            assert!(snapshot[0] < snapshot[1]);
            assert!(snapshot[1] < session.clock());
        });
        assert!(monitor.unsubscribed);
    }
}
