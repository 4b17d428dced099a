//! Engine counters.

use serde::Serialize;

/// What the engine has done since power-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EngineStats {
    /// Pulses sent during the boot window.
    pub boot_pulses: u64,
    /// Fast-forward pulses injected while slewing.
    pub slew_pulses: u64,
    /// Pulses injected by button actions.
    pub step_pulses: u64,
    /// Full detection passes without a qualifying reference.
    pub empty_detection_passes: u32,
    /// Seconds presses classified as taps.
    pub taps: u32,
    /// Seconds presses classified as holds.
    pub holds: u32,
    /// Completed resynchronizations.
    pub resyncs: u32,
    /// Steps spent waiting for the injection window.
    pub window_waits: u64,
}
