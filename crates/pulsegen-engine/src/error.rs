//! Engine configuration errors.

use pulsegen_input::InputError;
use pulsegen_pulse::PulseError;
use pulsegen_timebase::TimeBaseError;
use pulsegen_watchdog::WatchdogError;
use thiserror::Error;

/// A [`crate::ClockConfig`] that cannot drive the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Counter programming or detector parameters.
    #[error("time base: {0}")]
    TimeBase(#[from] TimeBaseError),

    /// A pulse profile.
    #[error("pulse profile: {0}")]
    Pulse(#[from] PulseError),

    /// Button steps or sample thresholds.
    #[error("input: {0}")]
    Input(#[from] InputError),

    /// Watchdog timeouts.
    #[error("watchdog: {0}")]
    Watchdog(#[from] WatchdogError),

    /// The resync preload would be zero or past the wrap.
    #[error("resync preload lead {lead} must be within 1..{target_hz}")]
    InvalidPreloadLead {
        /// Requested lead before the wrap.
        lead: u32,
        /// Target frequency.
        target_hz: u32,
    },

    /// The watchdog feed edge lies outside the second.
    #[error("feed edge at {edge} counts must be within 1..{target_hz}")]
    InvalidFeedEdge {
        /// Requested edge.
        edge: u32,
        /// Target frequency.
        target_hz: u32,
    },
}
