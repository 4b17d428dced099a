//! Calibrated pulse profiles.

use crate::error::PulseError;
use crate::frame::{CYCLES_PER_ITERATION, SerialFrame};

/// Core clock while running from the internal oscillator.
pub const INTERNAL_OSC_CORE_HZ: u32 = 30_000_000;

/// Core clock while running from the clock-in reference.
pub const CLOCK_IN_CORE_HZ: u32 = 5_000_000;

/// Busy-loop iteration counts for one pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PulseProfile {
    /// Iterations with the line driven low.
    pub low_cycles: u32,
    /// Iterations with the line driven high afterwards.
    pub high_cycles: u32,
}

impl PulseProfile {
    /// Calibrated for the 30 MHz internal oscillator core clock.
    pub const INTERNAL_OSC: Self = Self {
        low_cycles: 177,
        high_cycles: 17,
    };

    /// Calibrated for the 5 MHz clock-in core clock.
    pub const CLOCK_IN: Self = Self {
        low_cycles: 29,
        high_cycles: 10,
    };

    /// Create a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if either phase is empty.
    pub fn new(low_cycles: u32, high_cycles: u32) -> Result<Self, PulseError> {
        let profile = Self {
            low_cycles,
            high_cycles,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Validate the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if either phase is empty.
    pub fn validate(&self) -> Result<(), PulseError> {
        if self.low_cycles == 0 || self.high_cycles == 0 {
            return Err(PulseError::EmptyPhase {
                low: self.low_cycles,
                high: self.high_cycles,
            });
        }
        Ok(())
    }

    /// Low phase duration at `core_hz`, in nanoseconds.
    #[must_use]
    pub fn low_ns(&self, core_hz: u32) -> u64 {
        iterations_ns(self.low_cycles, core_hz)
    }

    /// High phase duration at `core_hz`, in nanoseconds.
    #[must_use]
    pub fn high_ns(&self, core_hz: u32) -> u64 {
        iterations_ns(self.high_cycles, core_hz)
    }

    /// Check that the pulse reads as a zero byte under `frame` at `core_hz`.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::OutOfFrame`] when the low phase misses the
    /// window.
    pub fn check_frame(&self, core_hz: u32, frame: &SerialFrame) -> Result<(), PulseError> {
        let low_ns = self.low_ns(core_hz);
        if frame.accepts_low_ns(ns_to_f64(low_ns)) {
            return Ok(());
        }
        let (min, max) = frame.zero_byte_low_window_ns();
        Err(PulseError::OutOfFrame {
            low_ns,
            min_ns: f64_to_ns(min),
            max_ns: f64_to_ns(max),
        })
    }
}

#[allow(clippy::cast_precision_loss)]
fn ns_to_f64(ns: u64) -> f64 {
    ns as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn f64_to_ns(ns: f64) -> u64 {
    ns.max(0.0).ceil() as u64
}

fn iterations_ns(iterations: u32, core_hz: u32) -> u64 {
    let cycles = u64::from(iterations) * u64::from(CYCLES_PER_ITERATION);
    cycles * 1_000_000_000 / u64::from(core_hz.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_read_as_zero_byte() {
        let frame = SerialFrame::CONSOLE;
        assert_eq!(
            PulseProfile::INTERNAL_OSC.check_frame(INTERNAL_OSC_CORE_HZ, &frame),
            Ok(())
        );
        assert_eq!(
            PulseProfile::CLOCK_IN.check_frame(CLOCK_IN_CORE_HZ, &frame),
            Ok(())
        );
    }

    #[test]
    fn test_presets_do_not_swap() {
        let frame = SerialFrame::CONSOLE;
        assert!(
            PulseProfile::INTERNAL_OSC
                .check_frame(CLOCK_IN_CORE_HZ, &frame)
                .is_err()
        );
        assert!(
            PulseProfile::CLOCK_IN
                .check_frame(INTERNAL_OSC_CORE_HZ, &frame)
                .is_err()
        );
    }

    #[test]
    fn test_durations() {
        assert_eq!(PulseProfile::CLOCK_IN.low_ns(CLOCK_IN_CORE_HZ), 75_400);
        assert_eq!(PulseProfile::CLOCK_IN.high_ns(CLOCK_IN_CORE_HZ), 26_000);
    }

    #[test]
    fn test_empty_phase_rejected() {
        assert_eq!(
            PulseProfile::new(0, 10),
            Err(PulseError::EmptyPhase { low: 0, high: 10 })
        );
        assert!(PulseProfile::new(29, 10).is_ok());
    }
}
