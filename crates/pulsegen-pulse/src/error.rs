//! Pulse profile errors.

use thiserror::Error;

/// Rejected pulse profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PulseError {
    /// A phase of the pulse has no iterations.
    #[error("pulse profile needs at least one low and one high iteration (got {low}/{high})")]
    EmptyPhase {
        /// Low iterations.
        low: u32,
        /// High iterations.
        high: u32,
    },

    /// The profile would not decode as a zero byte at this core clock.
    #[error("pulse low phase of {low_ns} ns is outside the {min_ns}..{max_ns} ns zero-byte window")]
    OutOfFrame {
        /// Low phase duration.
        low_ns: u64,
        /// Shortest acceptable low phase.
        min_ns: u64,
        /// Longest acceptable low phase (exclusive).
        max_ns: u64,
    },
}
