//! Engine configuration.
//!
//! Every timing constant of the firmware lives here with its calibrated
//! default. On hardware the defaults are the configuration; the simulator
//! lets a scenario file override individual fields.

use crate::error::ConfigError;
use pulsegen_hal::PinId;
use pulsegen_input::{ButtonMap, ConfirmationCounter, PressClassifier};
use pulsegen_pulse::PulseProfile;
use pulsegen_timebase::{
    DEFAULT_PULSE_LEAD_COUNTS, DEFAULT_TARGET_HZ, DEFAULT_WINDOW_GUARD_COUNTS, DetectorConfig,
    TimeBaseConfig,
};
use pulsegen_watchdog::WatchdogConfig;
use serde::{Deserialize, Serialize};

/// Watchdog timeouts in watchdog clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogTimeouts {
    /// Armed at power-on.
    pub boot_ticks: u32,
    /// Armed once the boot window has passed.
    pub operational_ticks: u32,
    /// Armed right before the bootloader hand-over.
    pub bootloader_ticks: u32,
}

impl WatchdogTimeouts {
    /// Convert to the watchdog crate's configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeouts are zero or shrink.
    pub fn to_config(self) -> Result<WatchdogConfig, ConfigError> {
        Ok(WatchdogConfig::new(
            self.boot_ticks,
            self.operational_ticks,
            self.bootloader_ticks,
        )?)
    }
}

impl Default for WatchdogTimeouts {
    fn default() -> Self {
        let config = WatchdogConfig::default();
        Self {
            boot_ticks: config.boot_timeout_ticks,
            operational_ticks: config.operational_timeout_ticks,
            bootloader_ticks: config.bootloader_timeout_ticks,
        }
    }
}

/// All engine constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Nominal reference frequency; the counter wraps after this many counts.
    pub target_hz: u32,
    /// Counts before the wrap at which the hardware pulse starts.
    pub pulse_lead_counts: u32,
    /// Counts kept clear of the wrap when injecting a pulse.
    pub window_guard_counts: u32,
    /// Counts before the wrap preloaded on resync. Compensates the delay
    /// between the external sync edge and the local pulse.
    pub resync_preload_lead: u32,
    /// The watchdog is fed when the phase drops below this count.
    pub feed_edge_counts: u32,
    /// Reference detection.
    pub detector: DetectorConfig,
    /// Profile used while the core runs from the internal oscillator.
    pub internal_profile: PulseProfile,
    /// Profile used while the core runs from the clock-in reference.
    pub clock_in_profile: PulseProfile,
    /// Ticks per press for seconds, minutes and hours.
    pub button_steps: [u32; 3],
    /// Pressed samples that make a seconds press a hold.
    pub hold_threshold_samples: u32,
    /// Delay between seconds-button samples while classifying.
    pub hold_sample_interval_ms: u32,
    /// Released samples that end a seconds press as a tap.
    pub release_debounce_samples: u32,
    /// Consecutive released samples that confirm a button release.
    pub release_confirm_samples: u32,
    /// Consecutive sync-free samples before a held resync arms on the next
    /// sync edge.
    pub resync_quiet_samples: u32,
    /// Pause between fast-forward pulses while slewing.
    pub slew_interval_ms: u32,
    /// Pulses sent at boot while the minutes button may request the
    /// bootloader.
    pub boot_window_pulses: u32,
    /// Watchdog timeouts.
    pub watchdog: WatchdogTimeouts,
}

impl ClockConfig {
    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> ClockConfigBuilder {
        ClockConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first field that cannot drive the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time_base()?;
        if self.resync_preload_lead == 0 || self.resync_preload_lead >= self.target_hz {
            return Err(ConfigError::InvalidPreloadLead {
                lead: self.resync_preload_lead,
                target_hz: self.target_hz,
            });
        }
        if self.feed_edge_counts == 0 || self.feed_edge_counts >= self.target_hz {
            return Err(ConfigError::InvalidFeedEdge {
                edge: self.feed_edge_counts,
                target_hz: self.target_hz,
            });
        }
        self.detector.validate()?;
        self.internal_profile.validate()?;
        self.clock_in_profile.validate()?;
        ButtonMap::with_steps(PinId::CLOCK_IN, self.button_steps)?;
        ButtonMap::with_steps(PinId::COUNTER_IN, self.button_steps)?;
        PressClassifier::new(self.hold_threshold_samples, self.release_debounce_samples)?;
        ConfirmationCounter::new(self.release_confirm_samples)?;
        ConfirmationCounter::new(self.resync_quiet_samples)?;
        self.watchdog.to_config()?;
        Ok(())
    }

    /// Counter programming for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the pulse or guard band do not fit the second.
    pub fn time_base(&self) -> Result<TimeBaseConfig, ConfigError> {
        Ok(TimeBaseConfig::with_calibration(
            self.target_hz,
            self.pulse_lead_counts,
            self.window_guard_counts,
        )?)
    }

    /// Counter value written on resync.
    #[must_use]
    pub fn resync_preload(&self) -> u32 {
        self.target_hz.saturating_sub(self.resync_preload_lead)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            target_hz: DEFAULT_TARGET_HZ,
            pulse_lead_counts: DEFAULT_PULSE_LEAD_COUNTS,
            window_guard_counts: DEFAULT_WINDOW_GUARD_COUNTS,
            resync_preload_lead: 366,
            feed_edge_counts: 10_000,
            detector: DetectorConfig::default(),
            internal_profile: PulseProfile::INTERNAL_OSC,
            clock_in_profile: PulseProfile::CLOCK_IN,
            button_steps: ButtonMap::DEFAULT_STEPS,
            hold_threshold_samples: 1000,
            hold_sample_interval_ms: 1,
            release_debounce_samples: 10,
            release_confirm_samples: 1000,
            resync_quiet_samples: 1000,
            slew_interval_ms: 100,
            boot_window_pulses: 86_400,
            watchdog: WatchdogTimeouts::default(),
        }
    }
}

/// Builder for `ClockConfig`.
#[derive(Debug, Default)]
pub struct ClockConfigBuilder {
    config: ClockConfig,
}

impl ClockConfigBuilder {
    /// Set the nominal reference frequency.
    #[must_use]
    pub fn target_hz(mut self, hz: u32) -> Self {
        self.config.target_hz = hz;
        self
    }

    /// Set the detection parameters.
    #[must_use]
    pub fn detector(mut self, detector: DetectorConfig) -> Self {
        self.config.detector = detector;
        self
    }

    /// Set the pulse lead before the wrap.
    #[must_use]
    pub fn pulse_lead_counts(mut self, counts: u32) -> Self {
        self.config.pulse_lead_counts = counts;
        self
    }

    /// Set the resync preload lead.
    #[must_use]
    pub fn resync_preload_lead(mut self, counts: u32) -> Self {
        self.config.resync_preload_lead = counts;
        self
    }

    /// Set both pulse profiles.
    #[must_use]
    pub fn profiles(mut self, internal: PulseProfile, clock_in: PulseProfile) -> Self {
        self.config.internal_profile = internal;
        self.config.clock_in_profile = clock_in;
        self
    }

    /// Set the step sizes, seconds first.
    #[must_use]
    pub fn button_steps(mut self, steps: [u32; 3]) -> Self {
        self.config.button_steps = steps;
        self
    }

    /// Set the hold threshold in samples.
    #[must_use]
    pub fn hold_threshold_samples(mut self, samples: u32) -> Self {
        self.config.hold_threshold_samples = samples;
        self
    }

    /// Set the release confirmation length in samples.
    #[must_use]
    pub fn release_confirm_samples(mut self, samples: u32) -> Self {
        self.config.release_confirm_samples = samples;
        self
    }

    /// Set the pause between slew pulses.
    #[must_use]
    pub fn slew_interval_ms(mut self, ms: u32) -> Self {
        self.config.slew_interval_ms = ms;
        self
    }

    /// Set the length of the boot window in pulses.
    #[must_use]
    pub fn boot_window_pulses(mut self, pulses: u32) -> Self {
        self.config.boot_window_pulses = pulses;
        self
    }

    /// Set the watchdog timeouts.
    #[must_use]
    pub fn watchdog(mut self, timeouts: WatchdogTimeouts) -> Self {
        self.config.watchdog = timeouts;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<ClockConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() -> Result<(), ConfigError> {
        let config = ClockConfig::default();
        config.validate()?;
        assert_eq!(config.resync_preload(), 4_999_634);
        assert_eq!(config.time_base()?.pulse_start_value, 4_999_608);
        Ok(())
    }

    #[test]
    fn test_preload_never_zero() {
        let config = ClockConfig {
            resync_preload_lead: 5_000_000,
            ..ClockConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPreloadLead { .. })
        ));
    }

    #[test]
    fn test_builder_rejects_flat_steps() {
        let result = ClockConfig::builder().button_steps([1, 1, 3600]).build();
        assert!(matches!(result, Err(ConfigError::Input(_))));
    }

    #[test]
    fn test_builder_rejects_shrinking_watchdog() {
        let result = ClockConfig::builder()
            .watchdog(WatchdogTimeouts {
                boot_ticks: 100,
                operational_ticks: 50,
                bootloader_ticks: 200,
            })
            .build();
        assert!(matches!(result, Err(ConfigError::Watchdog(_))));
    }
}
