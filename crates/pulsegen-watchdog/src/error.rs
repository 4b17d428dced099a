//! Error types for watchdog setup.
//!
//! Feeding never fails; only arming and configuration can be refused.

/// Errors from arming or configuring the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogError {
    /// `arm` was called on a guard that is already armed.
    AlreadyArmed,
    /// `rearm` was called before `arm`.
    NotArmed,
    /// A re-arm tried to shorten the running timeout.
    TimeoutShortened {
        /// Timeout currently in force.
        current: u32,
        /// Rejected replacement.
        requested: u32,
    },
    /// Invalid configuration.
    InvalidConfiguration(&'static str),
    /// State transition not allowed.
    InvalidTransition {
        /// Current state.
        from: &'static str,
        /// Attempted target state.
        to: &'static str,
    },
}

impl WatchdogError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(msg: &'static str) -> Self {
        Self::InvalidConfiguration(msg)
    }

    /// Create an invalid transition error.
    #[must_use]
    pub fn invalid_transition(from: &'static str, to: &'static str) -> Self {
        Self::InvalidTransition { from, to }
    }
}

impl core::fmt::Display for WatchdogError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AlreadyArmed => write!(f, "Watchdog is already armed"),
            Self::NotArmed => write!(f, "Watchdog is not armed"),
            Self::TimeoutShortened { current, requested } => write!(
                f,
                "Watchdog timeout can only grow: {current} ticks in force, {requested} requested"
            ),
            Self::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::InvalidTransition { from, to } => {
                write!(f, "Invalid state transition: {from} -> {to}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for WatchdogError {}

/// A specialized `Result` type for watchdog setup.
pub type WatchdogResult<T> = core::result::Result<T, WatchdogError>;

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::string::ToString;

    #[test]
    fn test_error_display() {
        assert_eq!(
            WatchdogError::AlreadyArmed.to_string(),
            "Watchdog is already armed"
        );
        assert_eq!(
            WatchdogError::TimeoutShortened {
                current: 100,
                requested: 10
            }
            .to_string(),
            "Watchdog timeout can only grow: 100 ticks in force, 10 requested"
        );
    }

    #[test]
    fn test_error_constructors() {
        let err = WatchdogError::invalid_configuration("zero timeout");
        assert!(matches!(err, WatchdogError::InvalidConfiguration(_)));

        let err = WatchdogError::invalid_transition("Expired", "Armed");
        assert!(matches!(err, WatchdogError::InvalidTransition { .. }));
    }
}
