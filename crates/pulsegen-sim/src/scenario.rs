//! Scenario files.
//!
//! A scenario describes the bench around the chip: which references are
//! wired, when the operator presses buttons, when the external 1PPS input
//! fires, and any engine constants to override. Files are YAML unless they
//! end in `.json`.

use crate::error::SimError;
use pulsegen_engine::ClockConfig;
use pulsegen_hal::PinId;
use pulsegen_input::ButtonId;
use pulsegen_timebase::ClockInput;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Watchdog clock of the target, in ticks per second.
pub const DEFAULT_WATCHDOG_HZ: u32 = 2_000;

/// One button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Press {
    /// Button pressed.
    pub button: ButtonId,
    /// Press instant.
    pub from_ms: u64,
    /// Release instant.
    pub until_ms: u64,
}

/// Periodic pulses on the external sync input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncPulses {
    /// First rising edge.
    pub first_ms: u64,
    /// Time between rising edges.
    pub period_ms: u64,
    /// High time of each pulse.
    pub width_ms: u64,
}

impl Default for SyncPulses {
    fn default() -> Self {
        Self {
            first_ms: 1_000,
            period_ms: 1_000,
            width_ms: 100,
        }
    }
}

impl SyncPulses {
    /// Whether the sync line is high at `now_ms`.
    #[must_use]
    pub fn is_high(&self, now_ms: u64) -> bool {
        now_ms
            .checked_sub(self.first_ms)
            .and_then(|since| since.checked_rem(self.period_ms))
            .is_some_and(|offset| offset < self.width_ms)
    }
}

/// A simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Label used in the report.
    pub name: String,
    /// Simulated time to run for.
    pub duration_ms: u64,
    /// Frequency on the clock-in line, zero when unwired.
    pub clock_in_hz: u32,
    /// Frequency on the counter-in line, zero when unwired.
    pub counter_in_hz: u32,
    /// Both references stop at this instant.
    pub reference_lost_ms: Option<u64>,
    /// Watchdog clock.
    pub watchdog_hz: u32,
    /// Operator button presses.
    pub presses: Vec<Press>,
    /// External 1PPS pulses.
    pub sync: Option<SyncPulses>,
    /// Engine constants.
    pub config: ClockConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            duration_ms: 3_000,
            clock_in_hz: 0,
            counter_in_hz: 5_000_000,
            reference_lost_ms: None,
            watchdog_hz: DEFAULT_WATCHDOG_HZ,
            presses: Vec::new(),
            sync: None,
            config: ClockConfig::default(),
        }
    }
}

impl Scenario {
    /// Load a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Parse a YAML scenario.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed YAML or unknown fields.
    pub fn from_yaml_str(text: &str) -> Result<Self, SimError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a JSON scenario.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or unknown fields.
    pub fn from_json_str(text: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check the scenario and its engine configuration.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), SimError> {
        self.config.validate()?;
        if self.duration_ms == 0 {
            return Err(SimError::InvalidScenario("duration_ms must be positive".into()));
        }
        if self.watchdog_hz == 0 {
            return Err(SimError::InvalidScenario("watchdog_hz must be positive".into()));
        }
        if let Some(press) = self.presses.iter().find(|p| p.until_ms <= p.from_ms) {
            return Err(SimError::InvalidScenario(format!(
                "{} press released at {} ms before it starts at {} ms",
                press.button, press.until_ms, press.from_ms
            )));
        }
        if let Some(sync) = self.sync
            && (sync.width_ms == 0 || sync.width_ms >= sync.period_ms)
        {
            return Err(SimError::InvalidScenario(
                "sync width must be positive and shorter than its period".into(),
            ));
        }
        Ok(())
    }

    /// Frequency wired to `input`.
    #[must_use]
    pub fn reference_hz(&self, input: ClockInput) -> u32 {
        match input {
            ClockInput::ClockIn => self.clock_in_hz,
            ClockInput::CounterIn => self.counter_in_hz,
        }
    }

    /// Input the engine will pick, if any reference qualifies.
    #[must_use]
    pub fn expected_source(&self) -> Option<ClockInput> {
        let detector = &self.config.detector;
        detector
            .candidates
            .iter()
            .copied()
            .find(|&input| self.reference_hz(input) > detector.threshold_hz)
    }

    /// Line a press of `button` pulls low.
    ///
    /// The seconds button shares the line of the candidate input that is not
    /// in use, so it depends on which reference is wired.
    #[must_use]
    pub fn line_of(&self, button: ButtonId) -> PinId {
        match button {
            ButtonId::Seconds => self
                .expected_source()
                .map_or(PinId::CLOCK_IN, |input| input.other().pin()),
            ButtonId::Minutes => PinId::MINUTES,
            ButtonId::Hours => PinId::HOURS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_pulse_train() {
        let sync = SyncPulses {
            first_ms: 1_000,
            period_ms: 1_000,
            width_ms: 10,
        };
        assert!(!sync.is_high(999));
        assert!(sync.is_high(1_000));
        assert!(sync.is_high(2_009));
        assert!(!sync.is_high(2_010));
    }

    #[test]
    fn test_seconds_line_follows_reference() {
        let counter_in = Scenario::default();
        assert_eq!(counter_in.line_of(ButtonId::Seconds), PinId::CLOCK_IN);

        let clock_in = Scenario {
            clock_in_hz: 5_000_000,
            ..Scenario::default()
        };
        assert_eq!(clock_in.line_of(ButtonId::Seconds), PinId::COUNTER_IN);
    }

    #[test]
    fn test_backwards_press_rejected() {
        let scenario = Scenario {
            presses: vec![Press {
                button: ButtonId::Minutes,
                from_ms: 500,
                until_ms: 400,
            }],
            ..Scenario::default()
        };
        assert!(matches!(
            scenario.validate(),
            Err(SimError::InvalidScenario(_))
        ));
    }
}
