//! Receiver framing targeted by the pulse calibration.

/// Core cycles spent in one iteration of the set-low/set-high loops.
pub const CYCLES_PER_ITERATION: u32 = 13;

/// Asynchronous serial framing, one start bit and no parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerialFrame {
    /// Bits per second.
    pub baud: u32,
    /// Data bits per character.
    pub data_bits: u8,
    /// Stop bits per character.
    pub stop_bits: u8,
}

impl SerialFrame {
    /// The console framing, 115200 8N1.
    pub const CONSOLE: Self = Self {
        baud: 115_200,
        data_bits: 8,
        stop_bits: 1,
    };

    /// One bit time in nanoseconds.
    #[must_use]
    pub fn bit_time_ns(&self) -> f64 {
        1e9 / f64::from(self.baud.max(1))
    }

    /// Bits from the start bit to the first stop bit.
    #[must_use]
    pub fn low_bits_of_zero_byte(&self) -> u32 {
        1 + u32::from(self.data_bits)
    }

    /// Window for the low phase of a zero byte, in nanoseconds.
    ///
    /// A receiver samples each bit in its middle, so the line must go low
    /// before the middle of the stop bit and stay low past the middle of the
    /// last data bit. The window is `[bits - 0.5, bits + 0.5)` bit times.
    #[must_use]
    pub fn zero_byte_low_window_ns(&self) -> (f64, f64) {
        let bits = f64::from(self.low_bits_of_zero_byte());
        let bit = self.bit_time_ns();
        ((bits - 0.5) * bit, (bits + 0.5) * bit)
    }

    /// Length of a full character, in nanoseconds.
    #[must_use]
    pub fn frame_ns(&self) -> f64 {
        let bits = self.low_bits_of_zero_byte() + u32::from(self.stop_bits);
        f64::from(bits) * self.bit_time_ns()
    }

    /// Whether a low phase of `low_ns` reads as a zero byte.
    #[must_use]
    pub fn accepts_low_ns(&self, low_ns: f64) -> bool {
        let (min, max) = self.zero_byte_low_window_ns();
        low_ns >= min && low_ns < max
    }
}

impl Default for SerialFrame {
    fn default() -> Self {
        Self::CONSOLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_window() {
        let (min, max) = SerialFrame::CONSOLE.zero_byte_low_window_ns();
        assert!((73_700.0..73_800.0).contains(&min));
        assert!((82_400.0..82_500.0).contains(&max));
        assert_eq!(SerialFrame::CONSOLE.low_bits_of_zero_byte(), 9);
    }

    #[test]
    fn test_frame_length() {
        let frame = SerialFrame::CONSOLE.frame_ns();
        assert!((86_800.0..86_900.0).contains(&frame));
    }
}
