//! Deadman state machine and metrics.
//!
//! Status and counters are atomics so that a [`crate::SoftwareWatchdog`] can
//! be shared by reference between the handle the firmware feeds and the
//! clock that advances it.

use portable_atomic::{AtomicU32, Ordering};

/// Deadman operational status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum WatchdogStatus {
    /// Not started. A fresh chip after reset.
    #[default]
    Disarmed = 0,
    /// Counting down; must be fed.
    Armed = 1,
    /// Countdown elapsed. The chip is being reset.
    Expired = 2,
}

impl WatchdogStatus {
    /// Convert from raw u32 value.
    #[must_use]
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Disarmed),
            1 => Some(Self::Armed),
            2 => Some(Self::Expired),
            _ => None,
        }
    }

    /// Convert to raw u32 value.
    #[must_use]
    pub fn to_raw(self) -> u32 {
        self as u32
    }

    /// Get the status as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disarmed => "Disarmed",
            Self::Armed => "Armed",
            Self::Expired => "Expired",
        }
    }
}

impl core::fmt::Display for WatchdogStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Atomic deadman state.
///
/// ```text
/// Disarmed ──arm()──► Armed ──expire()──► Expired
///     ▲                                      │
///     └───────────────── reset() ◄───────────┘
/// ```
#[derive(Debug)]
pub struct WatchdogState {
    status: AtomicU32,
    arm_count: AtomicU32,
    feed_count: AtomicU32,
    expiry_count: AtomicU32,
}

impl WatchdogState {
    /// Create a new state in the Disarmed status.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: AtomicU32::new(WatchdogStatus::Disarmed.to_raw()),
            arm_count: AtomicU32::new(0),
            feed_count: AtomicU32::new(0),
            expiry_count: AtomicU32::new(0),
        }
    }

    /// Get the current status.
    #[must_use]
    pub fn status(&self) -> WatchdogStatus {
        let raw = self.status.load(Ordering::Acquire);
        WatchdogStatus::from_raw(raw).unwrap_or(WatchdogStatus::Disarmed)
    }

    /// Transition from Disarmed to Armed.
    ///
    /// # Errors
    ///
    /// Returns an error if the current state is not `Disarmed`.
    pub fn arm(&self) -> Result<(), crate::error::WatchdogError> {
        self.transition(WatchdogStatus::Disarmed, WatchdogStatus::Armed)?;
        self.arm_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Record a feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the current state is not `Armed`.
    pub fn feed(&self) -> Result<(), crate::error::WatchdogError> {
        match self.status() {
            WatchdogStatus::Armed => {
                self.feed_count.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            other => Err(crate::error::WatchdogError::invalid_transition(
                other.as_str(),
                "Armed",
            )),
        }
    }

    /// Transition from Armed to Expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the current state is not `Armed`.
    pub fn expire(&self) -> Result<(), crate::error::WatchdogError> {
        self.transition(WatchdogStatus::Armed, WatchdogStatus::Expired)?;
        self.expiry_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Back to Disarmed, as after a chip reset. Counters are kept.
    pub fn reset(&self) {
        self.status
            .store(WatchdogStatus::Disarmed.to_raw(), Ordering::Release);
    }

    fn transition(
        &self,
        from: WatchdogStatus,
        to: WatchdogStatus,
    ) -> Result<(), crate::error::WatchdogError> {
        self.status
            .compare_exchange(from.to_raw(), to.to_raw(), Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|current| {
                let current = WatchdogStatus::from_raw(current).unwrap_or(WatchdogStatus::Disarmed);
                crate::error::WatchdogError::invalid_transition(current.as_str(), to.as_str())
            })
    }

    /// Number of times armed.
    #[must_use]
    pub fn arm_count(&self) -> u32 {
        self.arm_count.load(Ordering::Acquire)
    }

    /// Number of accepted feeds.
    #[must_use]
    pub fn feed_count(&self) -> u32 {
        self.feed_count.load(Ordering::Acquire)
    }

    /// Number of expiries.
    #[must_use]
    pub fn expiry_count(&self) -> u32 {
        self.expiry_count.load(Ordering::Acquire)
    }
}

impl Default for WatchdogState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of deadman counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatchdogMetrics {
    /// Accepted feeds.
    pub feed_count: u64,
    /// Arm operations.
    pub arm_count: u64,
    /// Expiries (resets caused).
    pub expiry_count: u64,
    /// Longest gap between two feeds, in ticks.
    pub max_feed_interval_ticks: u64,
}

impl WatchdogMetrics {
    /// Create a new metrics instance with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() -> Result<(), crate::error::WatchdogError> {
        let state = WatchdogState::new();
        assert_eq!(state.status(), WatchdogStatus::Disarmed);

        state.arm()?;
        assert_eq!(state.status(), WatchdogStatus::Armed);

        state.expire()?;
        assert_eq!(state.status(), WatchdogStatus::Expired);
        assert_eq!(state.expiry_count(), 1);

        state.reset();
        assert_eq!(state.status(), WatchdogStatus::Disarmed);
        assert_eq!(state.arm_count(), 1);
        Ok(())
    }

    #[test]
    fn test_arm_from_wrong_state() -> Result<(), crate::error::WatchdogError> {
        let state = WatchdogState::new();
        state.arm()?;

        let result = state.arm();
        assert_eq!(
            result,
            Err(crate::error::WatchdogError::invalid_transition("Armed", "Armed"))
        );
        Ok(())
    }

    #[test]
    fn test_feed_only_when_armed() -> Result<(), crate::error::WatchdogError> {
        let state = WatchdogState::new();
        assert!(state.feed().is_err());

        state.arm()?;
        state.feed()?;
        state.feed()?;
        assert_eq!(state.feed_count(), 2);

        state.expire()?;
        assert!(state.feed().is_err());
        Ok(())
    }

    #[test]
    fn test_raw_round_trip_rejects_unknown() {
        assert_eq!(WatchdogStatus::from_raw(1), Some(WatchdogStatus::Armed));
        assert_eq!(WatchdogStatus::from_raw(7), None);
    }
}
