//! Button identities, bindings and pressed sets.

use crate::error::InputError;
use core::fmt;
use pulsegen_hal::{PinId, PinMask};

/// One of the three front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ButtonId {
    /// Advances one tick, or resynchronizes.
    Seconds,
    /// Advances one minute.
    Minutes,
    /// Advances one hour.
    Hours,
}

impl ButtonId {
    /// All buttons in service order.
    pub const ALL: [Self; 3] = [Self::Seconds, Self::Minutes, Self::Hours];

    const fn bit(self) -> u8 {
        match self {
            Self::Seconds => 0b001,
            Self::Minutes => 0b010,
            Self::Hours => 0b100,
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds => write!(f, "seconds"),
            Self::Minutes => write!(f, "minutes"),
            Self::Hours => write!(f, "hours"),
        }
    }
}

/// A button bound to a port line and a step size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Button {
    /// Which button.
    pub id: ButtonId,
    /// Port line mask; the button is pressed when this line reads low.
    pub input_mask: PinMask,
    /// Ticks advanced per press.
    pub step_size: u32,
}

/// The three buttons as wired for one boot.
///
/// The seconds button sits on whichever reference candidate was not
/// selected, so the map is built after detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonMap {
    seconds: Button,
    minutes: Button,
    hours: Button,
}

impl ButtonMap {
    /// Step sizes of one second, one minute and one hour.
    pub const DEFAULT_STEPS: [u32; 3] = [1, 60, 3600];

    /// Bind the default steps, with the seconds button on `seconds_pin`.
    ///
    /// # Errors
    ///
    /// Returns an error if `seconds_pin` collides with the minutes or hours
    /// line.
    pub fn new(seconds_pin: PinId) -> Result<Self, InputError> {
        Self::with_steps(seconds_pin, Self::DEFAULT_STEPS)
    }

    /// Bind explicit step sizes, seconds first.
    ///
    /// # Errors
    ///
    /// Returns an error if a step is zero, the steps are not strictly
    /// increasing, or two buttons share a line.
    pub fn with_steps(seconds_pin: PinId, steps: [u32; 3]) -> Result<Self, InputError> {
        let [seconds, minutes, hours] = steps;
        if seconds == 0 {
            return Err(InputError::ZeroStep);
        }
        if !(seconds < minutes && minutes < hours) {
            return Err(InputError::StepsNotIncreasing(steps));
        }
        if seconds_pin == PinId::MINUTES || seconds_pin == PinId::HOURS {
            return Err(InputError::SharedLine);
        }
        Ok(Self {
            seconds: Button {
                id: ButtonId::Seconds,
                input_mask: seconds_pin.mask(),
                step_size: seconds,
            },
            minutes: Button {
                id: ButtonId::Minutes,
                input_mask: PinId::MINUTES.mask(),
                step_size: minutes,
            },
            hours: Button {
                id: ButtonId::Hours,
                input_mask: PinId::HOURS.mask(),
                step_size: hours,
            },
        })
    }

    /// Binding of one button.
    #[must_use]
    pub fn get(&self, id: ButtonId) -> &Button {
        match id {
            ButtonId::Seconds => &self.seconds,
            ButtonId::Minutes => &self.minutes,
            ButtonId::Hours => &self.hours,
        }
    }

    /// Step size of one button.
    #[must_use]
    pub fn step_size(&self, id: ButtonId) -> u32 {
        self.get(id).step_size
    }

    /// All bindings in service order.
    pub fn iter(&self) -> impl Iterator<Item = &Button> {
        [&self.seconds, &self.minutes, &self.hours].into_iter()
    }
}

/// Set of pressed buttons from one port snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PressedButtons(u8);

impl PressedButtons {
    /// No button pressed.
    pub const NONE: Self = Self(0);

    /// Add a button.
    pub fn insert(&mut self, id: ButtonId) {
        self.0 |= id.bit();
    }

    /// Whether `id` is pressed.
    #[must_use]
    pub fn contains(self, id: ButtonId) -> bool {
        self.0 & id.bit() != 0
    }

    /// Whether nothing is pressed.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of pressed buttons.
    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Pressed buttons in service order.
    pub fn iter(self) -> impl Iterator<Item = ButtonId> {
        ButtonId::ALL.into_iter().filter(move |id| self.contains(*id))
    }
}

impl FromIterator<ButtonId> for PressedButtons {
    fn from_iter<I: IntoIterator<Item = ButtonId>>(iter: I) -> Self {
        let mut pressed = Self::NONE;
        for id in iter {
            pressed.insert(id);
        }
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map() -> Result<(), InputError> {
        let map = ButtonMap::new(PinId::COUNTER_IN)?;
        assert_eq!(map.get(ButtonId::Seconds).input_mask, 0b100);
        assert_eq!(map.get(ButtonId::Minutes).input_mask, 0b1000);
        assert_eq!(map.get(ButtonId::Hours).input_mask, 0b10_0000);
        assert_eq!(
            map.iter().map(|b| b.step_size).collect::<Vec<_>>(),
            vec![1, 60, 3600]
        );
        Ok(())
    }

    #[test]
    fn test_steps_must_increase() {
        assert_eq!(
            ButtonMap::with_steps(PinId::CLOCK_IN, [1, 60, 60]),
            Err(InputError::StepsNotIncreasing([1, 60, 60]))
        );
        assert_eq!(
            ButtonMap::with_steps(PinId::CLOCK_IN, [0, 60, 3600]),
            Err(InputError::ZeroStep)
        );
    }

    #[test]
    fn test_seconds_pin_must_be_free() {
        assert_eq!(
            ButtonMap::new(PinId::MINUTES),
            Err(InputError::SharedLine)
        );
    }

    #[test]
    fn test_pressed_set() {
        let pressed: PressedButtons = [ButtonId::Hours, ButtonId::Seconds].into_iter().collect();
        assert!(pressed.contains(ButtonId::Seconds));
        assert!(!pressed.contains(ButtonId::Minutes));
        assert_eq!(pressed.len(), 2);
        assert_eq!(
            pressed.iter().collect::<Vec<_>>(),
            vec![ButtonId::Seconds, ButtonId::Hours]
        );
        assert!(PressedButtons::NONE.is_empty());
    }
}
