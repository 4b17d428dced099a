//! Engine-facing watchdog guard.

use crate::config::WatchdogConfig;
use crate::error::{WatchdogError, WatchdogResult};
use pulsegen_hal::WatchdogTimer;

/// Owns the deadman handle and enforces the arming discipline.
///
/// The guard is armed once at boot and may afterwards only be re-armed with a
/// longer timeout. Feeding cannot fail: an unarmed guard passes the feed
/// through to the timer, which ignores it, exactly like the hardware.
#[derive(Debug)]
pub struct WatchdogGuard<W: WatchdogTimer> {
    timer: W,
    config: WatchdogConfig,
    timeout_ticks: Option<u32>,
    feed_count: u32,
}

impl<W: WatchdogTimer> WatchdogGuard<W> {
    /// Wrap a timer handle. Nothing is started until [`WatchdogGuard::arm`].
    pub fn new(timer: W, config: WatchdogConfig) -> Self {
        Self {
            timer,
            config,
            timeout_ticks: None,
            feed_count: 0,
        }
    }

    /// Start the deadman with `timeout_ticks`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::AlreadyArmed`] on a second call, or
    /// [`WatchdogError::InvalidConfiguration`] for a zero timeout.
    pub fn arm(&mut self, timeout_ticks: u32) -> WatchdogResult<()> {
        if self.timeout_ticks.is_some() {
            return Err(WatchdogError::AlreadyArmed);
        }
        if timeout_ticks == 0 {
            return Err(WatchdogError::invalid_configuration(
                "timeout_ticks must be non-zero",
            ));
        }
        self.timer.start(timeout_ticks);
        self.timeout_ticks = Some(timeout_ticks);
        Ok(())
    }

    /// Arm with the configured boot timeout.
    ///
    /// # Errors
    ///
    /// See [`WatchdogGuard::arm`].
    pub fn arm_boot(&mut self) -> WatchdogResult<()> {
        self.arm(self.config.boot_timeout_ticks)
    }

    /// Replace the running timeout with a longer one. The countdown restarts.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::NotArmed`] before the first arm, or
    /// [`WatchdogError::TimeoutShortened`] if `timeout_ticks` is below the
    /// timeout in force.
    pub fn rearm(&mut self, timeout_ticks: u32) -> WatchdogResult<()> {
        let current = self.timeout_ticks.ok_or(WatchdogError::NotArmed)?;
        if timeout_ticks < current {
            return Err(WatchdogError::TimeoutShortened {
                current,
                requested: timeout_ticks,
            });
        }
        self.timer.start(timeout_ticks);
        self.timeout_ticks = Some(timeout_ticks);
        Ok(())
    }

    /// Widen to the operational timeout.
    ///
    /// # Errors
    ///
    /// See [`WatchdogGuard::rearm`].
    pub fn rearm_operational(&mut self) -> WatchdogResult<()> {
        self.rearm(self.config.operational_timeout_ticks)
    }

    /// Widen to the bootloader hand-over timeout.
    ///
    /// # Errors
    ///
    /// See [`WatchdogGuard::rearm`].
    pub fn rearm_bootloader(&mut self) -> WatchdogResult<()> {
        self.rearm(self.config.bootloader_timeout_ticks)
    }

    /// Restart the countdown.
    pub fn feed(&mut self) {
        self.timer.feed();
        self.feed_count = self.feed_count.wrapping_add(1);
    }

    /// Feeds issued through this guard.
    #[must_use]
    pub fn feed_count(&self) -> u32 {
        self.feed_count
    }

    /// Timeout in force, if armed.
    #[must_use]
    pub fn timeout_ticks(&self) -> Option<u32> {
        self.timeout_ticks
    }

    /// Whether [`WatchdogGuard::arm`] has succeeded.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.timeout_ticks.is_some()
    }

    /// The configured timeouts.
    #[must_use]
    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    /// The wrapped timer handle.
    pub fn timer_mut(&mut self) -> &mut W {
        &mut self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::software_impl::SoftwareWatchdog;

    #[test]
    fn test_arm_only_once() -> WatchdogResult<()> {
        let deadman = SoftwareWatchdog::new();
        let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());

        guard.arm_boot()?;
        assert!(guard.is_armed());
        assert_eq!(guard.timeout_ticks(), Some(0x1000));
        assert_eq!(guard.arm(0x1000), Err(WatchdogError::AlreadyArmed));
        Ok(())
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let deadman = SoftwareWatchdog::new();
        let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());
        assert!(guard.arm(0).is_err());
        assert!(!deadman.is_armed());
    }

    #[test]
    fn test_rearm_requires_arm() {
        let deadman = SoftwareWatchdog::new();
        let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());
        assert_eq!(guard.rearm(10), Err(WatchdogError::NotArmed));
    }

    #[test]
    fn test_rearm_only_grows() -> WatchdogResult<()> {
        let deadman = SoftwareWatchdog::new();
        let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());

        guard.arm_boot()?;
        guard.rearm_operational()?;
        assert_eq!(deadman.timeout_ticks(), 0x5000);

        assert_eq!(
            guard.rearm(0x1000),
            Err(WatchdogError::TimeoutShortened {
                current: 0x5000,
                requested: 0x1000
            })
        );
        guard.rearm_bootloader()?;
        assert_eq!(deadman.timeout_ticks(), 0x10000);
        Ok(())
    }

    #[test]
    fn test_feed_counts_and_reaches_timer() -> WatchdogResult<()> {
        let deadman = SoftwareWatchdog::new();
        let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());
        guard.arm(100)?;

        assert!(!deadman.advance(60));
        guard.feed();
        guard.feed();
        assert_eq!(deadman.elapsed_ticks(), 0);
        assert_eq!(guard.feed_count(), 2);
        Ok(())
    }
}
