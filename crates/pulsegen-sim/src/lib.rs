//! # pulsegen-sim
//!
//! Runs the pulsegen engine against a virtual board.
//!
//! The simulated board keeps time in nanoseconds and advances it only as the
//! firmware touches peripherals, so a run is deterministic and far faster
//! than real time. Around the chip it models the two reference inputs, the
//! front-panel buttons, the external 1PPS line, the watchdog and the serial
//! receiver of the legacy clock. A [`Report`] tells how many seconds the
//! clock advanced, whether every character decoded, and how each boot ended.
//!
//! ```rust,no_run
//! use pulsegen_sim::{Scenario, run};
//!
//! let scenario = Scenario::from_yaml_str("duration_ms: 2500")?;
//! let report = run(&scenario)?;
//! println!("{report}");
//! # Ok::<(), pulsegen_sim::SimError>(())
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod board;
pub mod error;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod uart;

pub use board::{Observations, SimBoard};
pub use error::SimError;
pub use report::{BootEnding, BootRecord, Report};
pub use runner::run;
pub use scenario::{Press, Scenario, SyncPulses};
pub use uart::{FrameVerdict, ReceivedFrame, UartCounters, UartMonitor};
