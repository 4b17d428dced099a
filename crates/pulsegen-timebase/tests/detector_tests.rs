//! Detection and time base behaviour against the scripted fake board.

use pulsegen_hal::{CounterInput, PinId};
use pulsegen_test_helpers::prelude::*;
use pulsegen_timebase::{
    ClockInput, ClockSource, ClockSourceDetector, DetectorConfig, TimeBase, TimeBaseConfig,
};

fn detector() -> ClockSourceDetector {
    must(ClockSourceDetector::new(DetectorConfig::default()))
}

#[test]
fn test_selects_first_candidate_above_threshold() {
    let bench = Bench::new()
        .with_clock_in_hz(400)
        .with_counter_in_hz(1200);
    let mut time_base = TimeBase::new(bench.counter());
    let mut delay = bench.delay();

    let source = must_some(detector().scan(&mut time_base, &mut delay), "no source");

    assert_eq!(source.input, ClockInput::CounterIn);
    assert_eq!(source.measured_hz, 1200);
    assert!(source.selected);
}

#[test]
fn test_first_match_wins_over_faster_candidate() {
    let bench = Bench::new()
        .with_clock_in_hz(5_000_000)
        .with_counter_in_hz(12_000_000);
    let mut time_base = TimeBase::new(bench.counter());
    let mut delay = bench.delay();

    let source = detector().detect(&mut time_base, &mut delay);

    assert_eq!(source.input, ClockInput::ClockIn);
    assert!((4_999_000..=5_001_000).contains(&source.measured_hz));
    assert_eq!(bench.now_ms(), 100);
}

#[test]
fn test_threshold_is_strict() {
    let bench = Bench::new().with_clock_in_hz(1000).with_counter_in_hz(1000);
    let mut time_base = TimeBase::new(bench.counter());
    let mut delay = bench.delay();

    assert_eq!(detector().scan(&mut time_base, &mut delay), None);
    assert_eq!(bench.now_ms(), 200);
}

#[test]
fn test_measure_reports_unselected_source() {
    let bench = Bench::new().with_clock_in_hz(400);
    let mut time_base = TimeBase::new(bench.counter());
    let mut delay = bench.delay();

    let source = detector().measure(&mut time_base, &mut delay, ClockInput::ClockIn);
    assert_eq!(
        source,
        ClockSource {
            input: ClockInput::ClockIn,
            measured_hz: 400,
            selected: false,
        }
    );
    assert_eq!(bench.counter_input(), CounterInput::Pin(PinId::CLOCK_IN));
}

#[test]
fn test_window_not_dividing_a_second_keeps_precision() {
    let bench = Bench::new().with_counter_in_hz(1200);
    let config = DetectorConfig {
        sample_window_ms: 300,
        ..DetectorConfig::default()
    };
    let detector = must(ClockSourceDetector::new(config));
    let mut time_base = TimeBase::new(bench.counter());
    let mut delay = bench.delay();

    let source = detector.measure(&mut time_base, &mut delay, ClockInput::CounterIn);
    // 360 counts scaled by 1000/300, not by the truncated factor 3.
    assert!((1195..=1205).contains(&source.measured_hz), "{}", source.measured_hz);
}

#[test]
fn test_candidate_order_is_respected() {
    let bench = Bench::new()
        .with_clock_in_hz(5_000_000)
        .with_counter_in_hz(5_000_000);
    let config = DetectorConfig {
        candidates: vec![ClockInput::CounterIn, ClockInput::ClockIn],
        ..DetectorConfig::default()
    };
    let detector = must(ClockSourceDetector::new(config));
    let mut time_base = TimeBase::new(bench.counter());
    let mut delay = bench.delay();

    let source = detector.detect(&mut time_base, &mut delay);
    assert_eq!(source.input, ClockInput::CounterIn);
}

#[test]
fn test_configure_programs_one_second_wrap() -> TestResult {
    let bench = Bench::new().with_counter_in_hz(5_000_000);
    let mut time_base = TimeBase::new(bench.counter());
    let source = ClockSource::selected(ClockInput::CounterIn, 5_000_000);

    let config = time_base.configure(&source, 5_000_000)?;
    assert_eq!(bench.counter_programming(), (4_999_999, 4_999_608));
    assert_eq!(bench.counter_input(), CounterInput::Pin(PinId::COUNTER_IN));
    assert!(!time_base.is_running());
    assert_eq!(time_base.config(), Some(&config));

    time_base.start();
    assert!(time_base.is_running());
    bench.advance_ms(1250);
    assert_eq!(bench.counter_value(), 1_250_000);
    Ok(())
}

#[test]
fn test_clock_in_counts_system_clock() -> TestResult {
    let bench = Bench::new().with_clock_in_hz(5_000_000);
    let mut time_base = TimeBase::new(bench.counter());
    let source = ClockSource::selected(ClockInput::ClockIn, 5_000_000);

    time_base.configure(&source, 5_000_000)?;
    assert_eq!(bench.counter_input(), CounterInput::SystemClock);
    Ok(())
}

#[test]
fn test_stop_reset_start_keeps_preload() -> TestResult {
    let bench = Bench::new().with_counter_in_hz(5_000_000);
    let mut time_base = TimeBase::new(bench.counter());
    let source = ClockSource::selected(ClockInput::CounterIn, 5_000_000);
    let config = time_base.configure(&source, 5_000_000)?;
    time_base.start();
    bench.advance_ms(300);

    time_base.stop();
    bench.advance_ms(700);
    let preload = config.counts_before_wrap(366);
    time_base.reset(preload);
    time_base.start();

    assert_eq!(bench.counter_value(), preload);
    assert_eq!(bench.counter_loads().last().copied(), Some(4_999_634));
    Ok(())
}

#[test]
fn test_reset_clamps_to_wrap() -> TestResult {
    let bench = Bench::new().with_counter_in_hz(5_000_000);
    let mut time_base = TimeBase::new(bench.counter());
    let source = ClockSource::selected(ClockInput::CounterIn, 5_000_000);
    time_base.configure(&source, 5_000_000)?;

    time_base.reset(u32::MAX);
    assert_eq!(time_base.phase(), 4_999_999);
    Ok(())
}

#[test]
fn test_pulse_window_follows_phase() -> TestResult {
    let bench = Bench::new().with_counter_in_hz(5_000_000);
    let mut time_base = TimeBase::new(bench.counter());
    let source = ClockSource::selected(ClockInput::CounterIn, 5_000_000);
    let config = TimeBaseConfig::new(5_000_000)?;
    time_base.configure_with(&source, config);

    time_base.reset(100);
    assert!(!time_base.pulse_window_open());
    time_base.reset(2_500_000);
    assert!(time_base.pulse_window_open());
    time_base.reset(config.pulse_start_value);
    assert!(!time_base.pulse_window_open());
    Ok(())
}
