//! Port 0 pin identities and the board's fixed pin assignment.

use core::fmt;

/// Bit mask over the 32 lines of port 0.
pub type PinMask = u32;

/// One line of port 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinId(u8);

impl PinId {
    /// External one-pulse-per-second sync input (pull-down, active high).
    pub const SYNC_IN: Self = Self(0);
    /// Reference candidate that can also clock the core (CLKIN).
    pub const CLOCK_IN: Self = Self(1);
    /// Reference candidate that can only be counted.
    pub const COUNTER_IN: Self = Self(2);
    /// Minutes button (active low). Also the bootloader request button.
    pub const MINUTES: Self = Self(3);
    /// Pulse output, shared with the console transmit line during boot.
    pub const PULSE_OUT: Self = Self(4);
    /// Hours button (active low). Doubles as the chip reset pin while enabled.
    pub const HOURS: Self = Self(5);

    /// Create a pin identity. Lines above 31 are folded onto the port width.
    #[must_use]
    pub const fn new(line: u8) -> Self {
        Self(line & 0x1f)
    }

    /// Port line number.
    #[must_use]
    pub const fn line(self) -> u8 {
        self.0
    }

    /// Single-bit mask selecting this line.
    #[must_use]
    pub const fn mask(self) -> PinMask {
        1 << self.0
    }

    /// Whether this line is high in a raw port snapshot.
    #[must_use]
    pub const fn is_high(self, levels: u32) -> bool {
        levels & self.mask() != 0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PIO0_{}", self.0)
    }
}
