//! Counter programming for a one-second time base.

use crate::error::{TimeBaseError, TimeBaseResult};

/// Nominal frequency of both reference inputs.
pub const DEFAULT_TARGET_HZ: u32 = 5_000_000;

/// Counts before the wrap at which the hardware pulse starts.
///
/// At 5 MHz this is 78.4 µs, one 0x00 frame at 115200 baud measured from
/// the falling edge of the start bit to the rising edge of the stop bit, so
/// the pulse ends exactly on the one-second boundary.
pub const DEFAULT_PULSE_LEAD_COUNTS: u32 = 392;

/// Counts kept clear on both sides of the wrap when injecting a pulse.
///
/// Covers the hardware pulse before the wrap and keeps an injected pulse from
/// straddling the boundary.
pub const DEFAULT_WINDOW_GUARD_COUNTS: u32 = 1000;

/// Counter programming derived from a target frequency.
///
/// `pulse_start_value < wrap_value` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBaseConfig {
    /// Counts per second.
    pub target_hz: u32,
    /// Last count before wrapping, `target_hz - 1`.
    pub wrap_value: u32,
    /// Count at which the hardware pulse starts.
    pub pulse_start_value: u32,
    /// Guard band for software pulse injection.
    pub window_guard_counts: u32,
    /// Whether the counter is counting.
    pub running: bool,
}

impl TimeBaseConfig {
    /// Program for `target_hz` with the calibrated pulse lead and guard.
    ///
    /// # Errors
    ///
    /// Returns an error if the frequency cannot hold the calibrated pulse.
    pub fn new(target_hz: u32) -> TimeBaseResult<Self> {
        Self::with_calibration(
            target_hz,
            DEFAULT_PULSE_LEAD_COUNTS,
            DEFAULT_WINDOW_GUARD_COUNTS,
        )
    }

    /// Program for `target_hz` with an explicit pulse lead and guard band.
    ///
    /// # Errors
    ///
    /// Returns an error if the pulse does not fit before the wrap or the guard
    /// band leaves no injection window.
    pub fn with_calibration(
        target_hz: u32,
        pulse_lead_counts: u32,
        window_guard_counts: u32,
    ) -> TimeBaseResult<Self> {
        if target_hz < 2 {
            return Err(TimeBaseError::InvalidFrequency(target_hz));
        }
        if pulse_lead_counts < 2 || pulse_lead_counts > target_hz {
            return Err(TimeBaseError::InvalidPulseLead {
                lead: pulse_lead_counts,
                target_hz,
            });
        }
        if window_guard_counts >= target_hz / 2 {
            return Err(TimeBaseError::InvalidWindowGuard {
                guard: window_guard_counts,
                target_hz,
            });
        }
        Ok(Self {
            target_hz,
            wrap_value: target_hz - 1,
            pulse_start_value: target_hz - pulse_lead_counts,
            window_guard_counts,
            running: false,
        })
    }

    /// Counts between the pulse start and the end of the second.
    #[must_use]
    pub fn pulse_lead_counts(&self) -> u32 {
        self.target_hz - self.pulse_start_value
    }

    /// Counter value `lead` counts before the end of the second.
    ///
    /// Saturates at zero for leads longer than a second.
    #[must_use]
    pub fn counts_before_wrap(&self, lead: u32) -> u32 {
        self.target_hz.saturating_sub(lead)
    }

    /// Whether a software pulse may start at `phase`.
    ///
    /// The window is `[guard, wrap + 1 - guard]`.
    #[must_use]
    pub fn window_contains(&self, phase: u32) -> bool {
        phase >= self.window_guard_counts
            && phase <= self.target_hz - self.window_guard_counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibrated_programming() -> TimeBaseResult<()> {
        let config = TimeBaseConfig::new(DEFAULT_TARGET_HZ)?;
        assert_eq!(config.wrap_value, 4_999_999);
        assert_eq!(config.pulse_start_value, 4_999_608);
        assert_eq!(config.pulse_lead_counts(), 392);
        assert!(config.pulse_start_value < config.wrap_value);
        assert!(!config.running);
        Ok(())
    }

    #[test]
    fn test_resync_preload_offset() -> TimeBaseResult<()> {
        let config = TimeBaseConfig::new(DEFAULT_TARGET_HZ)?;
        assert_eq!(config.counts_before_wrap(366), 4_999_634);
        assert_eq!(config.counts_before_wrap(u32::MAX), 0);
        Ok(())
    }

    #[test]
    fn test_window_bounds() -> TimeBaseResult<()> {
        let config = TimeBaseConfig::new(DEFAULT_TARGET_HZ)?;
        assert!(!config.window_contains(999));
        assert!(config.window_contains(1000));
        assert!(config.window_contains(4_999_000));
        assert!(!config.window_contains(4_999_001));
        assert!(!config.window_contains(config.pulse_start_value));
        Ok(())
    }

    #[test]
    fn test_rejects_degenerate_programming() {
        assert_eq!(
            TimeBaseConfig::new(1),
            Err(TimeBaseError::InvalidFrequency(1))
        );
        assert!(matches!(
            TimeBaseConfig::with_calibration(1000, 1, 10),
            Err(TimeBaseError::InvalidPulseLead { .. })
        ));
        assert!(matches!(
            TimeBaseConfig::with_calibration(1000, 10, 500),
            Err(TimeBaseError::InvalidWindowGuard { .. })
        ));
    }
}
