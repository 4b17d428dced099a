//! # pulsegen-pulse
//!
//! Software pulses that a serial receiver reads as a `0x00` byte.
//!
//! A [`PulseProfile`] is a pair of busy-loop iteration counts. Each preset is
//! calibrated for the core clock in effect while its reference is selected,
//! so the low phase spans the start bit plus eight zero data bits and the
//! rising edge lands inside the stop bit. [`SerialFrame`] holds the receiver
//! framing the calibration targets and can check a profile against it.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod encoder;
pub mod error;
pub mod frame;
pub mod profile;

pub use encoder::PulseEncoder;
pub use error::PulseError;
pub use frame::{CYCLES_PER_ITERATION, SerialFrame};
pub use profile::{CLOCK_IN_CORE_HZ, INTERNAL_OSC_CORE_HZ, PulseProfile};
