//! Delay, watchdog and system-level handles.

use core::fmt;

/// Millisecond busy delay.
pub trait DelayMs {
    /// Block for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Hardware deadman timer.
///
/// Once started it cannot be stopped. If [`WatchdogTimer::feed`] is not called
/// within the timeout the chip resets unconditionally.
pub trait WatchdogTimer {
    /// Enable the timer with a timeout in watchdog clock ticks, or change the
    /// timeout of a running timer. Either way the countdown restarts.
    fn start(&mut self, timeout_ticks: u32);

    /// Restart the countdown.
    fn feed(&mut self);
}

/// Clock tree, reset pin and console routing.
pub trait SystemControl {
    /// Switch the core clock to the external clock-in reference.
    fn use_clock_in(&mut self);

    /// Current core clock frequency in Hz.
    fn core_clock_hz(&self) -> u32;

    /// Enable or disable the external reset function on its shared pin.
    fn set_reset_pin(&mut self, enabled: bool);

    /// Attach or detach the diagnostic console from its pins.
    fn set_console(&mut self, attached: bool);
}

/// Bootloader version reported by the in-system-programming interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootloaderVersion {
    /// Major version.
    pub major: u8,
    /// Minor version.
    pub minor: u8,
}

impl BootloaderVersion {
    /// Decode the packed `major << 8 | minor` word.
    #[must_use]
    pub const fn from_word(word: u32) -> Self {
        Self {
            major: ((word >> 8) & 0xff) as u8,
            minor: (word & 0xff) as u8,
        }
    }
}

impl fmt::Display for BootloaderVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Chip identity queries.
pub trait DeviceInfo {
    /// Part identification number.
    fn part_id(&mut self) -> u32;

    /// Boot ROM version.
    fn bootloader_version(&mut self) -> BootloaderVersion;

    /// 128-bit device serial number.
    fn unique_id(&mut self) -> [u32; 4];
}

/// Re-entry into the boot ROM's firmware-update mode.
pub trait Bootloader {
    /// Hand control to the boot ROM. Does not return on hardware; host
    /// implementations record the request and return.
    fn enter_bootloader(&mut self);
}
