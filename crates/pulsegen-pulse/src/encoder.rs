//! Bit-banged pulse emission.

use crate::profile::PulseProfile;
use pulsegen_hal::{OutputRoute, PulseOutput};

/// Drives the pulse output pin by hand.
///
/// `emit` is synchronous: it returns once the whole waveform is on the
/// line. The caller decides who owns the pin; [`PulseEncoder::inject`] takes
/// it from the time base for one pulse and hands it back.
#[derive(Debug)]
pub struct PulseEncoder<O: PulseOutput> {
    output: O,
    route: OutputRoute,
    emitted: u64,
}

impl<O: PulseOutput> PulseEncoder<O> {
    /// Wrap the output pin. The pin is left as it is.
    pub fn new(output: O) -> Self {
        Self {
            output,
            route: OutputRoute::Released,
            emitted: 0,
        }
    }

    /// Drive the line low for `profile.low_cycles` iterations, then high for
    /// `profile.high_cycles` iterations.
    ///
    /// Only visible on the line while the pin is routed to software.
    pub fn emit(&mut self, profile: PulseProfile) {
        for _ in 0..profile.low_cycles {
            self.output.set_low();
        }
        for _ in 0..profile.high_cycles {
            self.output.set_high();
        }
        self.emitted = self.emitted.wrapping_add(1);
    }

    /// Detach the pin from the time base, emit one pulse, and re-attach it.
    pub fn inject(&mut self, profile: PulseProfile) {
        self.route(OutputRoute::Software);
        self.emit(profile);
        self.route(OutputRoute::Timer);
    }

    /// Hand the pin to a new driver.
    pub fn route(&mut self, route: OutputRoute) {
        self.output.route(route);
        self.route = route;
    }

    /// Current driver of the pin.
    #[must_use]
    pub fn current_route(&self) -> OutputRoute {
        self.route
    }

    /// Pulses emitted so far.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// The wrapped output.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
