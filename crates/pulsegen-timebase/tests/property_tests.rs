//! Property-based tests for detection and counter programming.

use proptest::prelude::*;
use pulsegen_test_helpers::prelude::*;
use pulsegen_timebase::{ClockInput, ClockSourceDetector, DetectorConfig, TimeBaseConfig};
use pulsegen_timebase::TimeBase;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_detect_returns_first_qualifying_candidate(
        clock_in_hz in 0u32..3000,
        counter_in_hz in 0u32..3000,
    ) {
        let bench = Bench::new()
            .with_clock_in_hz(clock_in_hz)
            .with_counter_in_hz(counter_in_hz);
        let detector = must(ClockSourceDetector::new(DetectorConfig::default()));
        let mut time_base = TimeBase::new(bench.counter());
        let mut delay = bench.delay();

        let found = detector.scan(&mut time_base, &mut delay);
        let expected = if clock_in_hz / 10 * 10 > 1000 {
            Some(ClockInput::ClockIn)
        } else if counter_in_hz / 10 * 10 > 1000 {
            Some(ClockInput::CounterIn)
        } else {
            None
        };
        prop_assert_eq!(found.map(|source| source.input), expected);
    }

    #[test]
    fn prop_pulse_start_precedes_wrap(
        target_hz in 2_000u32..50_000_000,
        lead in 2u32..1000,
    ) {
        let config = must(TimeBaseConfig::with_calibration(target_hz, lead, 100));
        prop_assert!(config.pulse_start_value < config.wrap_value);
        prop_assert_eq!(config.wrap_value, target_hz - 1);
        prop_assert_eq!(config.pulse_lead_counts(), lead);
    }
}
