//! Tick-driven software deadman.
//!
//! `SoftwareWatchdog` stands in for the hardware deadman on the host. It has
//! no clock of its own: whoever owns virtual time calls
//! [`SoftwareWatchdog::advance`] and learns whether the chip would have reset.
//! All methods take `&self`, so a shared reference can be handed to the
//! firmware as its [`WatchdogTimer`] while the clock keeps the owner.

use crate::state::{WatchdogMetrics, WatchdogState, WatchdogStatus};
use portable_atomic::{AtomicU32, Ordering};
use pulsegen_hal::WatchdogTimer;

/// Software deadman counting abstract watchdog ticks.
///
/// # Example
///
/// ```rust
/// use pulsegen_watchdog::SoftwareWatchdog;
///
/// let deadman = SoftwareWatchdog::new();
/// deadman.start(10);
/// assert!(!deadman.advance(9));
/// deadman.feed();
/// assert!(!deadman.advance(9));
/// assert!(deadman.advance(1));
/// assert!(deadman.has_expired());
/// ```
#[derive(Debug)]
pub struct SoftwareWatchdog {
    state: WatchdogState,
    timeout_ticks: AtomicU32,
    elapsed_ticks: AtomicU32,
    max_feed_interval_ticks: AtomicU32,
}

impl SoftwareWatchdog {
    /// Create a disarmed deadman.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: WatchdogState::new(),
            timeout_ticks: AtomicU32::new(0),
            elapsed_ticks: AtomicU32::new(0),
            max_feed_interval_ticks: AtomicU32::new(0),
        }
    }

    /// Arm the deadman, or replace the timeout of a running one.
    ///
    /// The countdown restarts either way. Has no effect once expired; only
    /// [`SoftwareWatchdog::reset`] brings an expired deadman back.
    pub fn start(&self, timeout_ticks: u32) {
        match self.state.status() {
            WatchdogStatus::Expired => return,
            WatchdogStatus::Disarmed => {
                if self.state.arm().is_err() {
                    return;
                }
            }
            WatchdogStatus::Armed => {}
        }
        self.timeout_ticks.store(timeout_ticks, Ordering::Release);
        self.elapsed_ticks.store(0, Ordering::Release);
    }

    /// Restart the countdown. Ignored unless armed, like the hardware.
    pub fn feed(&self) {
        if self.state.feed().is_ok() {
            let interval = self.elapsed_ticks.swap(0, Ordering::AcqRel);
            self.max_feed_interval_ticks
                .fetch_max(interval, Ordering::AcqRel);
        }
    }

    /// Let `ticks` watchdog clock ticks pass.
    ///
    /// Returns `true` if the deadman is expired afterwards, i.e. the chip
    /// resets. Expiry happens when the ticks since the last feed reach the
    /// timeout: a feed every `timeout - 1` ticks keeps it alive.
    pub fn advance(&self, ticks: u32) -> bool {
        match self.state.status() {
            WatchdogStatus::Disarmed => false,
            WatchdogStatus::Expired => true,
            WatchdogStatus::Armed => {
                let elapsed = self
                    .elapsed_ticks
                    .load(Ordering::Acquire)
                    .saturating_add(ticks);
                self.elapsed_ticks.store(elapsed, Ordering::Release);
                if elapsed >= self.timeout_ticks.load(Ordering::Acquire) {
                    self.state.expire().is_ok() || self.has_expired()
                } else {
                    false
                }
            }
        }
    }

    /// Whether the deadman has fired.
    #[must_use]
    pub fn has_expired(&self) -> bool {
        self.state.status() == WatchdogStatus::Expired
    }

    /// Whether the deadman is counting down.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.state.status() == WatchdogStatus::Armed
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> WatchdogStatus {
        self.state.status()
    }

    /// Timeout in force, zero before the first start.
    #[must_use]
    pub fn timeout_ticks(&self) -> u32 {
        self.timeout_ticks.load(Ordering::Acquire)
    }

    /// Ticks since the last feed or start.
    #[must_use]
    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks.load(Ordering::Acquire)
    }

    /// Simulate the chip reset that follows an expiry.
    ///
    /// The deadman returns to Disarmed. Metrics survive so a host can count
    /// resets across boots.
    pub fn reset(&self) {
        self.state.reset();
        self.timeout_ticks.store(0, Ordering::Release);
        self.elapsed_ticks.store(0, Ordering::Release);
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn metrics(&self) -> WatchdogMetrics {
        WatchdogMetrics {
            feed_count: u64::from(self.state.feed_count()),
            arm_count: u64::from(self.state.arm_count()),
            expiry_count: u64::from(self.state.expiry_count()),
            max_feed_interval_ticks: u64::from(
                self.max_feed_interval_ticks.load(Ordering::Acquire),
            ),
        }
    }
}

impl Default for SoftwareWatchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchdogTimer for SoftwareWatchdog {
    fn start(&mut self, timeout_ticks: u32) {
        SoftwareWatchdog::start(self, timeout_ticks);
    }

    fn feed(&mut self) {
        SoftwareWatchdog::feed(self);
    }
}

impl WatchdogTimer for &SoftwareWatchdog {
    fn start(&mut self, timeout_ticks: u32) {
        SoftwareWatchdog::start(*self, timeout_ticks);
    }

    fn feed(&mut self) {
        SoftwareWatchdog::feed(*self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_software_watchdog_creation() {
        let deadman = SoftwareWatchdog::new();
        assert!(!deadman.is_armed());
        assert!(!deadman.has_expired());
        assert_eq!(deadman.timeout_ticks(), 0);
        assert_eq!(deadman.elapsed_ticks(), 0);
    }

    #[test]
    fn test_disarmed_never_expires() {
        let deadman = SoftwareWatchdog::new();
        assert!(!deadman.advance(u32::MAX));
        assert_eq!(deadman.status(), WatchdogStatus::Disarmed);
    }

    #[test]
    fn test_expires_exactly_at_timeout() {
        let deadman = SoftwareWatchdog::new();
        deadman.start(100);
        assert!(!deadman.advance(99));
        assert_eq!(deadman.elapsed_ticks(), 99);
        assert!(deadman.advance(1));
        assert_eq!(deadman.status(), WatchdogStatus::Expired);
        assert!(deadman.advance(0));
    }

    #[test]
    fn test_feed_restarts_countdown() {
        let deadman = SoftwareWatchdog::new();
        deadman.start(100);
        for _ in 0..50 {
            assert!(!deadman.advance(99));
            deadman.feed();
        }
        let metrics = deadman.metrics();
        assert_eq!(metrics.feed_count, 50);
        assert_eq!(metrics.max_feed_interval_ticks, 99);
    }

    #[test]
    fn test_restart_widens_timeout() {
        let deadman = SoftwareWatchdog::new();
        deadman.start(10);
        assert!(!deadman.advance(9));
        deadman.start(1000);
        assert_eq!(deadman.elapsed_ticks(), 0);
        assert!(!deadman.advance(999));
        assert_eq!(deadman.metrics().arm_count, 1);
    }

    #[test]
    fn test_feed_after_expiry_is_ignored() {
        let deadman = SoftwareWatchdog::new();
        deadman.start(5);
        assert!(deadman.advance(5));
        deadman.feed();
        deadman.start(50);
        assert!(deadman.has_expired());
        assert_eq!(deadman.metrics().feed_count, 0);
    }

    #[test]
    fn test_reset_keeps_metrics() {
        let deadman = SoftwareWatchdog::new();
        deadman.start(5);
        assert!(deadman.advance(5));
        deadman.reset();

        assert_eq!(deadman.status(), WatchdogStatus::Disarmed);
        assert_eq!(deadman.metrics().expiry_count, 1);

        deadman.start(5);
        assert!(deadman.is_armed());
        assert_eq!(deadman.metrics().arm_count, 2);
    }

    #[test]
    fn test_shared_reference_as_timer() {
        let deadman = SoftwareWatchdog::new();
        let mut handle = &deadman;
        WatchdogTimer::start(&mut handle, 20);
        assert!(!deadman.advance(19));
        WatchdogTimer::feed(&mut handle);
        assert_eq!(deadman.elapsed_ticks(), 0);
    }
}
