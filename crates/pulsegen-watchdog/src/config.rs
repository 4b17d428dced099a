//! Timeout configuration for the three watchdog phases.

use crate::error::{WatchdogError, WatchdogResult};

/// Watchdog timeouts, in watchdog clock ticks.
///
/// The firmware arms a short timeout at boot, widens it once operational,
/// and widens it again right before handing over to the bootloader so the
/// hand-over cannot be interrupted. Timeouts only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogConfig {
    /// Timeout armed at power-on, covering the bootloader window.
    ///
    /// Default: `0x1000` ticks.
    pub boot_timeout_ticks: u32,

    /// Timeout once the firmware is operational.
    ///
    /// Default: `0x5000` ticks.
    pub operational_timeout_ticks: u32,

    /// Timeout armed right before entering the bootloader.
    ///
    /// Default: `0x10000` ticks.
    pub bootloader_timeout_ticks: u32,
}

impl WatchdogConfig {
    /// Create a configuration from explicit timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if any timeout is zero or the timeouts do not grow
    /// from boot to operational to bootloader.
    pub fn new(
        boot_timeout_ticks: u32,
        operational_timeout_ticks: u32,
        bootloader_timeout_ticks: u32,
    ) -> WatchdogResult<Self> {
        let config = Self {
            boot_timeout_ticks,
            operational_timeout_ticks,
            bootloader_timeout_ticks,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> WatchdogResult<()> {
        if self.boot_timeout_ticks == 0 {
            return Err(WatchdogError::invalid_configuration(
                "boot_timeout_ticks must be non-zero",
            ));
        }
        if self.operational_timeout_ticks < self.boot_timeout_ticks {
            return Err(WatchdogError::invalid_configuration(
                "operational_timeout_ticks must not be shorter than boot_timeout_ticks",
            ));
        }
        if self.bootloader_timeout_ticks < self.operational_timeout_ticks {
            return Err(WatchdogError::invalid_configuration(
                "bootloader_timeout_ticks must not be shorter than operational_timeout_ticks",
            ));
        }
        Ok(())
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            boot_timeout_ticks: 0x1000,
            operational_timeout_ticks: 0x5000,
            bootloader_timeout_ticks: 0x10000,
        }
    }
}
