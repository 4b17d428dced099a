//! Common imports for driving the engine.

pub use crate::config::{ClockConfig, WatchdogTimeouts};
pub use crate::error::ConfigError;
pub use crate::machine::{EngineState, SyncState, SyncStateMachine};
pub use crate::selection::ActiveClock;
pub use crate::stats::EngineStats;
pub use pulsegen_hal::Board;
pub use pulsegen_input::ButtonId;
pub use pulsegen_pulse::PulseProfile;
pub use pulsegen_timebase::{ClockInput, DetectorConfig};
