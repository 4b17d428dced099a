//! Everything that changes together when a reference is selected.

use crate::config::ClockConfig;
use crate::error::ConfigError;
use pulsegen_input::ButtonMap;
use pulsegen_pulse::PulseProfile;
use pulsegen_timebase::{ClockInput, ClockSource};

/// The selected reference with its pulse profile and button wiring.
///
/// Built in one piece so the profile can never lag behind the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveClock {
    /// The reference driving timing.
    pub source: ClockSource,
    /// Profile calibrated for the core clock this source implies.
    pub profile: PulseProfile,
    /// Buttons, with seconds on the unselected candidate line.
    pub buttons: ButtonMap,
}

/// Precomputed [`ActiveClock`] halves for both inputs.
///
/// Validation happens once at construction so selection itself cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSelection {
    clock_in: (PulseProfile, ButtonMap),
    counter_in: (PulseProfile, ButtonMap),
}

impl ClockSelection {
    /// Prepare both selections from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a profile or the button steps are invalid.
    pub fn new(config: &ClockConfig) -> Result<Self, ConfigError> {
        config.clock_in_profile.validate()?;
        config.internal_profile.validate()?;
        Ok(Self {
            clock_in: (
                config.clock_in_profile,
                ButtonMap::with_steps(ClockInput::CounterIn.pin(), config.button_steps)?,
            ),
            counter_in: (
                config.internal_profile,
                ButtonMap::with_steps(ClockInput::ClockIn.pin(), config.button_steps)?,
            ),
        })
    }

    /// Bind profile and buttons to a detected source.
    #[must_use]
    pub fn select(&self, source: ClockSource) -> ActiveClock {
        let (profile, buttons) = self.for_input(source.input);
        ActiveClock {
            source: ClockSource {
                selected: true,
                ..source
            },
            profile,
            buttons,
        }
    }

    /// Profile and buttons that go with `input`.
    #[must_use]
    pub fn for_input(&self, input: ClockInput) -> (PulseProfile, ButtonMap) {
        match input {
            ClockInput::ClockIn => self.clock_in,
            ClockInput::CounterIn => self.counter_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsegen_hal::PinId;
    use pulsegen_input::ButtonId;

    #[test]
    fn test_profile_follows_source() -> Result<(), ConfigError> {
        let selection = ClockSelection::new(&ClockConfig::default())?;

        let clock_in = selection.select(ClockSource::selected(ClockInput::ClockIn, 5_000_000));
        assert_eq!(clock_in.profile, PulseProfile::CLOCK_IN);
        assert_eq!(
            clock_in.buttons.get(ButtonId::Seconds).input_mask,
            PinId::COUNTER_IN.mask()
        );

        let counter_in = selection.select(ClockSource::selected(ClockInput::CounterIn, 5_000_000));
        assert_eq!(counter_in.profile, PulseProfile::INTERNAL_OSC);
        assert_eq!(
            counter_in.buttons.get(ButtonId::Seconds).input_mask,
            PinId::CLOCK_IN.mask()
        );
        Ok(())
    }

    #[test]
    fn test_selection_marks_source_selected() -> Result<(), ConfigError> {
        let selection = ClockSelection::new(&ClockConfig::default())?;
        let active = selection.select(ClockSource {
            input: ClockInput::CounterIn,
            measured_hz: 1200,
            selected: false,
        });
        assert!(active.source.selected);
        Ok(())
    }
}
