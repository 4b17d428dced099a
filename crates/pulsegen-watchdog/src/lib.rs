//! # pulsegen-watchdog
//!
//! Deadman watchdog handling for the pulse-train generator.
//!
//! The watchdog is the firmware's only recovery mechanism: any wait that never
//! resolves (no reference clock, a button held forever) starves it and the
//! chip restarts from boot. This crate provides:
//!
//! - [`WatchdogGuard`] - the engine-facing wrapper around a
//!   [`pulsegen_hal::WatchdogTimer`] handle (`arm` once, `rearm` with a longer
//!   timeout, infallible `feed`)
//! - [`WatchdogConfig`] - boot, operational and bootloader timeouts
//! - [`SoftwareWatchdog`] - a tick-driven deadman used by the simulator and by
//!   tests in place of the hardware timer
//! - [`WatchdogState`] - the atomic Disarmed/Armed/Expired state machine
//!
//! ## State Machine
//!
//! ```text
//! Disarmed ──start()──► Armed ──timeout elapsed──► Expired
//!     ▲                 │   ▲                         │
//!     │                 └───┘ feed() / start()        │
//!     └────────────────── reset() ◄───────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pulsegen_watchdog::prelude::*;
//!
//! let deadman = SoftwareWatchdog::new();
//! let mut guard = WatchdogGuard::new(&deadman, WatchdogConfig::default());
//!
//! guard.arm(16).expect("first arm");
//! assert!(!deadman.advance(15));
//! guard.feed();
//! assert!(!deadman.advance(15));
//! assert!(deadman.advance(1));
//! ```

#![no_std]
#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic
)]
#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod error;
pub mod guard;
pub mod prelude;
pub mod software_impl;
pub mod state;

pub use config::WatchdogConfig;
pub use error::{WatchdogError, WatchdogResult};
pub use guard::WatchdogGuard;
pub use software_impl::SoftwareWatchdog;
pub use state::{WatchdogMetrics, WatchdogState, WatchdogStatus};
