//! Polling and classification against the scripted fake port.

use proptest::prelude::*;
use pulsegen_hal::PinId;
use pulsegen_input::{
    ButtonId, ButtonMap, ConfirmationCounter, InputController, PressClassifier, PressKind,
};
use pulsegen_test_helpers::prelude::*;

#[test]
fn test_poll_follows_script() {
    let bench = Bench::new();
    bench.press(PinId::MINUTES, 5, 10);
    bench.press(PinId::COUNTER_IN, 8, 12);
    let mut input = InputController::new(bench.port(), must(ButtonMap::new(PinId::COUNTER_IN)));

    assert!(input.poll().is_empty());
    bench.advance_ms(6);
    assert_eq!(input.poll().iter().collect::<Vec<_>>(), vec![ButtonId::Minutes]);
    bench.advance_ms(3);
    assert_eq!(
        input.poll().iter().collect::<Vec<_>>(),
        vec![ButtonId::Seconds, ButtonId::Minutes]
    );
    bench.advance_ms(5);
    assert!(input.poll().is_empty());
}

#[test]
fn test_sync_is_active_high() {
    let bench = Bench::new();
    bench.drive_high(PinId::SYNC_IN, 1, 2);
    let mut input = InputController::new(bench.port(), must(ButtonMap::new(PinId::CLOCK_IN)));

    assert!(!input.sync_asserted());
    bench.advance_ms(1);
    assert!(input.sync_asserted());
    assert!(input.poll().is_empty());
}

#[test]
fn test_classify_scripted_hold() {
    let bench = Bench::new();
    bench.press(PinId::CLOCK_IN, 0, 2000);
    let mut input = InputController::new(bench.port(), must(ButtonMap::new(PinId::CLOCK_IN)));
    let mut classifier = must(PressClassifier::new(1000, 10));
    let mut delay = bench.delay();

    let kind = loop {
        if let Some(kind) = classifier.observe(input.is_pressed(ButtonId::Seconds)) {
            break kind;
        }
        pulsegen_hal::DelayMs::delay_ms(&mut delay, 1);
    };

    assert_eq!(kind, PressKind::Hold);
    assert!((999..=1001).contains(&bench.now_ms()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_press_shorter_than_threshold_is_tap(held in 1u32..990) {
        let mut classifier = must(PressClassifier::new(1000, 10));
        for _ in 0..held {
            prop_assert_eq!(classifier.observe(true), None);
        }
        let mut decision = None;
        for _ in 0..10 {
            decision = classifier.observe(false);
        }
        prop_assert_eq!(decision, Some(PressKind::Tap));
    }

    #[test]
    fn prop_single_glitch_never_taps(glitches in proptest::collection::vec(1u32..999, 0..20)) {
        let mut classifier = must(PressClassifier::new(1000, 10));
        let mut decision = None;
        for run in glitches {
            for _ in 0..run {
                decision = classifier.observe(true).or(decision);
            }
            decision = classifier.observe(false).or(decision);
        }
        prop_assert_ne!(decision, Some(PressKind::Tap));
    }

    #[test]
    fn prop_confirmation_needs_unbroken_streak(
        required in 1u32..100,
        samples in proptest::collection::vec(any::<bool>(), 0..300),
    ) {
        let mut counter = must(ConfirmationCounter::new(required));
        let mut streak = 0u32;
        for sample in samples {
            streak = if sample { streak + 1 } else { 0 };
            prop_assert_eq!(counter.observe(sample), streak >= required);
        }
    }
}
