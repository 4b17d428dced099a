//! Free-running cycle counter behind the time base.

use crate::pins::PinId;

/// Clock fed into the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CounterInput {
    /// Count core clock cycles.
    SystemClock,
    /// Count rising edges on an input line.
    Pin(PinId),
}

/// A 32-bit up-counter with an auto-reload limit and one match output.
///
/// While routed to the timer, the output pin goes low when the count reaches
/// the match value and returns high when the count wraps at the limit.
pub trait CycleCounter {
    /// Select what the counter counts. Takes effect immediately.
    fn select_input(&mut self, input: CounterInput);

    /// Last count before wrapping to zero.
    fn set_limit(&mut self, limit: u32);

    /// Count at which the output pulse starts.
    fn set_match(&mut self, value: u32);

    /// Current count.
    fn count(&mut self) -> u32;

    /// Force the count.
    fn load(&mut self, value: u32);

    /// Stop counting, keeping the current value.
    fn halt(&mut self);

    /// Resume counting from the current value.
    fn resume(&mut self);
}
