//! # pulsegen-timebase
//!
//! The one-second time base and the reference clock detector.
//!
//! - [`ClockSourceDetector`] measures each candidate reference input over a
//!   fixed window and selects the first one above a threshold.
//! - [`TimeBase`] programs the free-running counter to wrap once per second
//!   at the selected reference frequency and exposes its phase.
//!
//! The counter output pin goes low at [`TimeBaseConfig::pulse_start_value`]
//! and high again at the wrap, so with the pulse output routed to the timer
//! the board emits one pulse per second without any software involvement.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod config;
pub mod detector;
pub mod error;
pub mod source;
pub mod time_base;

pub use config::{
    DEFAULT_PULSE_LEAD_COUNTS, DEFAULT_TARGET_HZ, DEFAULT_WINDOW_GUARD_COUNTS, TimeBaseConfig,
};
pub use detector::{ClockSourceDetector, DetectorConfig};
pub use error::{TimeBaseError, TimeBaseResult};
pub use source::{ClockInput, ClockSource};
pub use time_base::TimeBase;
