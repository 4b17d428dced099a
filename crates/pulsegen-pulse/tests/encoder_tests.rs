//! Pulse encoder behaviour on the fake output.

use proptest::prelude::*;
use pulsegen_hal::OutputRoute;
use pulsegen_pulse::{PulseEncoder, PulseProfile};
use pulsegen_test_helpers::prelude::*;

#[test]
fn test_emit_follows_profile() {
    let bench = Bench::new();
    let mut encoder = PulseEncoder::new(bench.output());
    encoder.route(OutputRoute::Software);

    encoder.emit(PulseProfile::INTERNAL_OSC);
    encoder.emit(PulseProfile::CLOCK_IN);

    assert_eq!(
        bench.pulse_shapes(),
        vec![
            PulseShape {
                low_iterations: 177,
                high_iterations: 17
            },
            PulseShape {
                low_iterations: 29,
                high_iterations: 10
            },
        ]
    );
    assert_eq!(encoder.emitted(), 2);
}

#[test]
fn test_inject_hands_pin_back_to_timer() {
    let bench = Bench::new();
    let mut encoder = PulseEncoder::new(bench.output());
    encoder.route(OutputRoute::Timer);

    encoder.inject(PulseProfile::CLOCK_IN);

    assert_eq!(
        bench.route_log(),
        vec![OutputRoute::Timer, OutputRoute::Software, OutputRoute::Timer]
    );
    assert_eq!(bench.software_pulses(), 1);
    assert_eq!(encoder.current_route(), OutputRoute::Timer);
}

#[test]
fn test_emit_while_released_is_invisible() {
    let bench = Bench::new();
    let mut encoder = PulseEncoder::new(bench.output());

    encoder.emit(PulseProfile::INTERNAL_OSC);

    assert_eq!(bench.software_pulses(), 0);
    assert_eq!(encoder.emitted(), 1);
}

#[test]
fn test_emit_takes_calibrated_time() {
    let bench = Bench::new();
    let mut encoder = PulseEncoder::new(bench.output());
    encoder.route(OutputRoute::Software);

    encoder.emit(PulseProfile::INTERNAL_OSC);

    // 194 iterations of 433 ns at the 30 MHz internal oscillator.
    assert_eq!(bench.now_ns(), 194 * 433);
}

proptest! {
    #[test]
    fn prop_emit_count_matches_calls(low in 1u32..200, high in 1u32..50, count in 0usize..40) {
        let bench = Bench::new();
        let mut encoder = PulseEncoder::new(bench.output());
        encoder.route(OutputRoute::Software);
        let profile = must(PulseProfile::new(low, high));

        for _ in 0..count {
            encoder.emit(profile);
        }

        prop_assert_eq!(bench.software_pulses(), count);
        let all_shapes_match = bench.pulse_shapes().iter().all(|shape| {
            shape.low_iterations == low && shape.high_iterations == high
        });
        prop_assert!(all_shapes_match);
    }
}
