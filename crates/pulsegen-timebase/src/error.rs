//! Time base and detector configuration errors.

use thiserror::Error;

/// Rejected time base or detector parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeBaseError {
    /// Target frequency too low to hold a pulse before the wrap.
    #[error("target frequency {0} Hz is too low for a one-second time base")]
    InvalidFrequency(u32),

    /// Pulse lead does not fit between zero and the wrap.
    #[error("pulse lead of {lead} counts does not fit a {target_hz} Hz time base")]
    InvalidPulseLead {
        /// Requested lead in counts before the wrap.
        lead: u32,
        /// Target frequency.
        target_hz: u32,
    },

    /// Window guard leaves no room to inject a pulse.
    #[error("window guard of {guard} counts leaves no injection window at {target_hz} Hz")]
    InvalidWindowGuard {
        /// Requested guard band.
        guard: u32,
        /// Target frequency.
        target_hz: u32,
    },

    /// The detector has nothing to measure.
    #[error("detector candidate list is empty")]
    NoCandidates,

    /// Zero-length sampling window.
    #[error("detector sample window must be at least 1 ms")]
    InvalidSampleWindow,
}

/// A specialized `Result` type for time base setup.
pub type TimeBaseResult<T> = Result<T, TimeBaseError>;
