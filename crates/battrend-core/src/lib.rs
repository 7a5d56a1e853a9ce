//! Hardware-independent core library for battrend
//!
//! Samples a device's battery temperature and charge at two rates and keeps
//! two bounded histories: a 60-second live window at one sample per second
//! and a 72-hour snapshot history at one point per minute. The chart module
//! renders either view with embedded-graphics.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod chart;
pub mod config;
pub mod sampler;
pub mod sensors;
pub mod session;
pub mod storage;
pub mod units;
pub mod view;
