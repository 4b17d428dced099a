//! Reference clock inputs and the detection result.

use core::fmt;
use pulsegen_hal::{CounterInput, PinId};

/// One of the two reference inputs built into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClockInput {
    /// The clock-in pin. When selected it also becomes the core clock.
    ClockIn,
    /// The counter input pin. Counted directly; the core keeps its internal
    /// oscillator.
    CounterIn,
}

impl ClockInput {
    /// Both inputs in detection order.
    pub const ALL: [Self; 2] = [Self::ClockIn, Self::CounterIn];

    /// Pin carrying this reference.
    #[must_use]
    pub const fn pin(self) -> PinId {
        match self {
            Self::ClockIn => PinId::CLOCK_IN,
            Self::CounterIn => PinId::COUNTER_IN,
        }
    }

    /// Counter input while measuring this reference.
    #[must_use]
    pub const fn measurement_input(self) -> CounterInput {
        CounterInput::Pin(self.pin())
    }

    /// Counter input once this reference is selected.
    ///
    /// The clock-in reference is counted through the core clock it drives.
    #[must_use]
    pub const fn operating_input(self) -> CounterInput {
        match self {
            Self::ClockIn => CounterInput::SystemClock,
            Self::CounterIn => CounterInput::Pin(PinId::COUNTER_IN),
        }
    }

    /// Whether selecting this reference switches the core clock over to it.
    #[must_use]
    pub const fn drives_core(self) -> bool {
        matches!(self, Self::ClockIn)
    }

    /// The other input.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::ClockIn => Self::CounterIn,
            Self::CounterIn => Self::ClockIn,
        }
    }
}

impl fmt::Display for ClockInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClockIn => write!(f, "clock-in ({})", self.pin()),
            Self::CounterIn => write!(f, "counter-in ({})", self.pin()),
        }
    }
}

/// A measured reference input.
///
/// Produced by the detector; the selected one is fixed for the rest of the
/// boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockSource {
    /// Which input was measured.
    pub input: ClockInput,
    /// Frequency seen over the sample window.
    pub measured_hz: u32,
    /// Whether this input won detection.
    pub selected: bool,
}

impl ClockSource {
    /// A source that has been chosen to drive timing.
    #[must_use]
    pub const fn selected(input: ClockInput, measured_hz: u32) -> Self {
        Self {
            input,
            measured_hz,
            selected: true,
        }
    }
}
