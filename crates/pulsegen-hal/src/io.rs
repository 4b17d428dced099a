//! Digital input snapshot and pulse output handles.

/// Raw level snapshot of port 0.
///
/// Bit `n` is 1 when line `n` is electrically high. Buttons are active low,
/// so a pressed button reads as a 0 bit.
pub trait InputPort {
    /// Read the whole port in one access.
    fn read(&mut self) -> u32;
}

/// Who drives the pulse output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputRoute {
    /// Pin is an input (high impedance); nothing is driven.
    #[default]
    Released,
    /// Pin is a GPIO output driven by [`PulseOutput::set_low`]/[`PulseOutput::set_high`].
    Software,
    /// Pin follows the counter's match/limit output.
    Timer,
}

/// The pulse output pin.
///
/// Switching to [`OutputRoute::Software`] must leave the line at its idle
/// (high) level so the hand-over from the timer is glitch free.
pub trait PulseOutput {
    /// Hand the pin to a new driver.
    fn route(&mut self, route: OutputRoute);

    /// Drive the line low. One call is one busy-loop iteration.
    fn set_low(&mut self);

    /// Drive the line high. One call is one busy-loop iteration.
    fn set_high(&mut self);
}
