//! The free-running one-second counter.

use crate::config::TimeBaseConfig;
use crate::error::TimeBaseResult;
use crate::source::ClockSource;
use pulsegen_hal::{CounterInput, CycleCounter};
use tracing::debug;

/// Owns the counter and its programming.
///
/// Before [`TimeBase::configure`] the counter is free to be used for
/// frequency measurement; afterwards it wraps once per second.
#[derive(Debug)]
pub struct TimeBase<C: CycleCounter> {
    counter: C,
    config: Option<TimeBaseConfig>,
}

impl<C: CycleCounter> TimeBase<C> {
    /// Take ownership of the counter. Nothing is programmed yet.
    pub fn new(counter: C) -> Self {
        Self {
            counter,
            config: None,
        }
    }

    /// Count `input` freely over the full 32-bit range, for measurement.
    ///
    /// Drops any one-second programming.
    pub fn count_freely(&mut self, input: CounterInput) {
        self.config = None;
        self.counter.halt();
        self.counter.select_input(input);
        self.counter.set_limit(u32::MAX);
        self.counter.set_match(u32::MAX);
        self.counter.load(0);
        self.counter.resume();
    }

    /// Program a one-second wrap for `source` at `target_hz` with the
    /// calibrated pulse timing.
    ///
    /// The counter is left stopped at zero; call [`TimeBase::start`].
    ///
    /// # Errors
    ///
    /// Returns an error if `target_hz` cannot hold the calibrated pulse.
    pub fn configure(
        &mut self,
        source: &ClockSource,
        target_hz: u32,
    ) -> TimeBaseResult<TimeBaseConfig> {
        let config = TimeBaseConfig::new(target_hz)?;
        self.configure_with(source, config);
        Ok(config)
    }

    /// Program the counter from a prepared configuration.
    pub fn configure_with(&mut self, source: &ClockSource, mut config: TimeBaseConfig) {
        self.counter.halt();
        self.counter.select_input(source.input.operating_input());
        self.counter.set_limit(config.wrap_value);
        self.counter.set_match(config.pulse_start_value);
        self.counter.load(0);
        config.running = false;
        debug!(
            input = %source.input,
            wrap = config.wrap_value,
            pulse_start = config.pulse_start_value,
            "time base configured"
        );
        self.config = Some(config);
    }

    /// Start counting from the current value.
    pub fn start(&mut self) {
        self.counter.resume();
        if let Some(config) = self.config.as_mut() {
            config.running = true;
        }
    }

    /// Stop counting, keeping the current value.
    pub fn stop(&mut self) {
        self.counter.halt();
        if let Some(config) = self.config.as_mut() {
            config.running = false;
        }
    }

    /// Current sub-second count.
    pub fn phase(&mut self) -> u32 {
        self.counter.count()
    }

    /// Force the counter to `value`, clamped to the wrap value.
    ///
    /// This is the only way to shift the phase against an external reference.
    pub fn reset(&mut self, value: u32) {
        let value = match self.config {
            Some(config) => value.min(config.wrap_value),
            None => value,
        };
        self.counter.load(value);
    }

    /// Whether a software pulse may start now without colliding with the
    /// hardware pulse or the wrap. Always true before configuration.
    pub fn pulse_window_open(&mut self) -> bool {
        match self.config {
            Some(config) => {
                let phase = self.counter.count();
                config.window_contains(phase)
            }
            None => true,
        }
    }

    /// Whether the counter is counting.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.config.is_some_and(|config| config.running)
    }

    /// Current programming, if configured.
    #[must_use]
    pub fn config(&self) -> Option<&TimeBaseConfig> {
        self.config.as_ref()
    }

    /// The underlying counter.
    pub fn counter_mut(&mut self) -> &mut C {
        &mut self.counter
    }
}
