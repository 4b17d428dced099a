//! Property-based tests for the deadman boundary and the guard's arming rules.

#![cfg(test)]

use pulsegen_watchdog::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_feed_at_t_minus_one_never_resets(
        timeout in 2u32..100_000,
        periods in 1usize..50,
    ) {
        let deadman = SoftwareWatchdog::new();
        let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());
        prop_assert_eq!(guard.arm(timeout), Ok(()));

        for _ in 0..periods {
            prop_assert!(!deadman.advance(timeout - 1));
            guard.feed();
        }
        prop_assert!(deadman.is_armed());
    }

    #[test]
    fn prop_starving_for_t_ticks_resets(
        timeout in 1u32..100_000,
        split in 0u32..100_000,
    ) {
        let deadman = SoftwareWatchdog::new();
        deadman.start(timeout);

        let first = split % timeout;
        prop_assert!(!deadman.advance(first));
        prop_assert!(deadman.advance(timeout - first));
        prop_assert_eq!(deadman.status(), WatchdogStatus::Expired);
    }

    #[test]
    fn prop_rearm_never_shortens(
        first in 1u32..10_000,
        second in 1u32..10_000,
    ) {
        let deadman = SoftwareWatchdog::new();
        let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());
        prop_assert_eq!(guard.arm(first), Ok(()));

        let result = guard.rearm(second);
        if second >= first {
            prop_assert_eq!(result, Ok(()));
            prop_assert_eq!(deadman.timeout_ticks(), second);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(deadman.timeout_ticks(), first);
        }
    }

    #[test]
    fn prop_reset_always_returns_to_disarmed(
        do_arm in any::<bool>(),
        ticks in 0u32..1000,
    ) {
        let deadman = SoftwareWatchdog::new();
        if do_arm {
            deadman.start(500);
        }
        let _expired = deadman.advance(ticks);

        deadman.reset();
        prop_assert_eq!(deadman.status(), WatchdogStatus::Disarmed);
        prop_assert!(!deadman.advance(u32::MAX));
    }
}
