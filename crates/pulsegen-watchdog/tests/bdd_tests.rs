//! BDD tests for the firmware's watchdog lifecycle.
//!
//! Feature: deadman_lifecycle.feature

#![cfg(test)]

use pulsegen_watchdog::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

mod deadman_lifecycle_scenarios {
    use super::*;

    /// Scenario: A fed firmware survives far beyond its timeout
    #[test]
    fn scenario_fed_firmware_survives() -> TestResult {
        let deadman = SoftwareWatchdog::new();
        let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());
        guard.arm_boot()?;
        guard.rearm_operational()?;

        for _ in 0..1000 {
            assert!(!deadman.advance(0x4000));
            guard.feed();
        }
        assert_eq!(deadman.metrics().expiry_count, 0);
        Ok(())
    }

    /// Scenario: A firmware stuck in detection is reset
    #[test]
    fn scenario_stuck_detection_resets() -> TestResult {
        let deadman = SoftwareWatchdog::new();
        let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());
        guard.arm_boot()?;

        let mut waited = 0u32;
        while !deadman.advance(1) {
            waited += 1;
        }
        assert_eq!(waited, 0x1000 - 1);
        assert!(deadman.has_expired());
        Ok(())
    }

    /// Scenario: The chip comes back disarmed after a reset
    #[test]
    fn scenario_reboot_starts_from_boot_timeout() -> TestResult {
        let deadman = SoftwareWatchdog::new();
        {
            let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());
            guard.arm_boot()?;
            guard.rearm_operational()?;
            assert!(deadman.advance(0x5000));
        }
        deadman.reset();

        let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());
        guard.arm_boot()?;
        assert_eq!(deadman.timeout_ticks(), 0x1000);
        assert_eq!(deadman.metrics().arm_count, 2);
        Ok(())
    }

    /// Scenario: Bootloader hand-over gets the longest timeout
    #[test]
    fn scenario_bootloader_handover_widens_timeout() -> TestResult {
        let deadman = SoftwareWatchdog::new();
        let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());
        guard.arm_boot()?;
        guard.rearm_bootloader()?;

        assert!(!deadman.advance(0xffff));
        assert!(matches!(
            guard.rearm_operational(),
            Err(WatchdogError::TimeoutShortened { .. })
        ));
        Ok(())
    }
}
