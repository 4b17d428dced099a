//! Loading engine configuration from scenario-style documents.

use pulsegen_engine::prelude::*;
use pulsegen_test_helpers::prelude::*;

#[test]
fn test_partial_yaml_keeps_calibrated_defaults() -> TestResult {
    let yaml = r"
boot_window_pulses: 20
slew_interval_ms: 50
detector:
  candidates: [counter_in]
  threshold_hz: 2000
watchdog:
  operational_ticks: 30000
";
    let config: ClockConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;

    assert_eq!(config.boot_window_pulses, 20);
    assert_eq!(config.slew_interval_ms, 50);
    assert_eq!(config.detector.candidates, vec![ClockInput::CounterIn]);
    assert_eq!(config.detector.threshold_hz, 2000);
    assert_eq!(config.detector.sample_window_ms, 100);
    assert_eq!(config.watchdog.operational_ticks, 30_000);
    assert_eq!(config.watchdog.boot_ticks, 0x1000);
    assert_eq!(config.internal_profile, PulseProfile::INTERNAL_OSC);
    assert_eq!(config.resync_preload(), 4_999_634);
    Ok(())
}

#[test]
fn test_json_profile_override() -> TestResult {
    let json = r#"{ "clock_in_profile": { "low_cycles": 30, "high_cycles": 9 } }"#;
    let config: ClockConfig = serde_json::from_str(json)?;

    assert_eq!(config.clock_in_profile, PulseProfile::new(30, 9)?);
    assert_eq!(config.button_steps, [1, 60, 3600]);
    Ok(())
}

#[test]
fn test_default_survives_json() -> TestResult {
    let config = ClockConfig::default();
    let text = serde_json::to_string(&config)?;
    let back: ClockConfig = serde_json::from_str(&text)?;
    assert_eq!(back, config);
    Ok(())
}

#[test]
fn test_invalid_override_is_reported() -> TestResult {
    let config: ClockConfig = serde_yaml::from_str("button_steps: [60, 1, 3600]")?;
    assert!(matches!(config.validate(), Err(ConfigError::Input(_))));
    Ok(())
}
