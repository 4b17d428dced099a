//! Reference clock detection.

use crate::error::{TimeBaseError, TimeBaseResult};
use crate::source::{ClockInput, ClockSource};
use crate::time_base::TimeBase;
use pulsegen_hal::{CycleCounter, DelayMs};
use tracing::{debug, info};

/// Detection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorConfig {
    /// Inputs to try, in priority order.
    pub candidates: Vec<ClockInput>,
    /// Length of each measurement.
    pub sample_window_ms: u32,
    /// A candidate qualifies when its frequency is strictly above this.
    pub threshold_hz: u32,
}

impl DetectorConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty candidate list or a zero window.
    pub fn validate(&self) -> TimeBaseResult<()> {
        if self.candidates.is_empty() {
            return Err(TimeBaseError::NoCandidates);
        }
        if self.sample_window_ms == 0 {
            return Err(TimeBaseError::InvalidSampleWindow);
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            candidates: ClockInput::ALL.to_vec(),
            sample_window_ms: 100,
            threshold_hz: 1000,
        }
    }
}

/// Picks the first candidate whose measured frequency clears the threshold.
///
/// Qualifying candidates are never compared with each other: the list order
/// alone decides.
#[derive(Debug, Clone)]
pub struct ClockSourceDetector {
    config: DetectorConfig,
}

impl ClockSourceDetector {
    /// Create a detector.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: DetectorConfig) -> TimeBaseResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The detection parameters.
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Measure one input over the sample window.
    ///
    /// The returned source is marked selected when it qualifies.
    pub fn measure<C, D>(
        &self,
        time_base: &mut TimeBase<C>,
        delay: &mut D,
        input: ClockInput,
    ) -> ClockSource
    where
        C: CycleCounter,
        D: DelayMs,
    {
        time_base.count_freely(input.measurement_input());
        let first = time_base.phase();
        delay.delay_ms(self.config.sample_window_ms);
        let second = time_base.phase();

        let delta = u64::from(second.wrapping_sub(first));
        // Scale before dividing so any window length stays exact.
        let hz = delta.saturating_mul(1000) / u64::from(self.config.sample_window_ms.max(1));
        let measured_hz = u32::try_from(hz).unwrap_or(u32::MAX);

        info!("{}: {} Hz", input, measured_hz);
        ClockSource {
            input,
            measured_hz,
            selected: measured_hz > self.config.threshold_hz,
        }
    }

    /// One pass over the candidates. `None` if nothing qualified.
    pub fn scan<C, D>(&self, time_base: &mut TimeBase<C>, delay: &mut D) -> Option<ClockSource>
    where
        C: CycleCounter,
        D: DelayMs,
    {
        for &input in &self.config.candidates {
            let source = self.measure(time_base, delay, input);
            if source.selected {
                info!("selected {}", source.input);
                return Some(source);
            }
        }
        debug!("no reference above {} Hz", self.config.threshold_hz);
        None
    }

    /// Repeat passes until a candidate qualifies.
    ///
    /// Never feeds the watchdog: with no reference present this loops until
    /// the deadman resets the chip.
    pub fn detect<C, D>(&self, time_base: &mut TimeBase<C>, delay: &mut D) -> ClockSource
    where
        C: CycleCounter,
        D: DelayMs,
    {
        loop {
            if let Some(source) = self.scan(time_base, delay) {
                return source;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(
            config.candidates,
            vec![ClockInput::ClockIn, ClockInput::CounterIn]
        );
        assert_eq!(config.sample_window_ms, 100);
        assert_eq!(config.threshold_hz, 1000);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_empty_candidates() {
        let config = DetectorConfig {
            candidates: Vec::new(),
            ..DetectorConfig::default()
        };
        assert_eq!(
            ClockSourceDetector::new(config).map(|_| ()),
            Err(TimeBaseError::NoCandidates)
        );
    }

    #[test]
    fn test_rejects_zero_window() {
        let config = DetectorConfig {
            sample_window_ms: 0,
            ..DetectorConfig::default()
        };
        assert!(ClockSourceDetector::new(config).is_err());
    }
}
