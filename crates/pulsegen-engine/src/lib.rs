//! # pulsegen-engine
//!
//! The top-level controller of the clock retrofit.
//!
//! [`SyncStateMachine`] owns every peripheral handle of one boot and walks
//! through the boot window, reference detection, slewing, tracking and
//! resynchronization. [`ClockConfig`] gathers the calibrated constants in one
//! serde-friendly struct.
//!
//! ```text
//! Booting ──► Detecting ──► Slewing ──► Tracking ◄──► Resyncing
//!    │
//!    └── minutes held ──► Bootloader
//! ```
//!
//! The engine is driven by calling [`SyncStateMachine::step`] in a loop. Each
//! call performs a bounded amount of work so the caller stays in control of
//! time; the watchdog remains the only escape from a wait that never ends.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod boot;
pub mod config;
pub mod error;
pub mod feed;
pub mod machine;
pub mod prelude;
pub mod selection;
pub mod stats;

pub use boot::DeviceBanner;
pub use config::{ClockConfig, ClockConfigBuilder, WatchdogTimeouts};
pub use error::ConfigError;
pub use feed::FeedEdge;
pub use machine::{EngineState, SyncState, SyncStateMachine};
pub use selection::{ActiveClock, ClockSelection};
pub use stats::EngineStats;
