//! # pulsegen-hal
//!
//! Peripheral handles used by the pulsegen timing engine.
//!
//! Every piece of hardware the engine touches is reached through a handle
//! object that is injected at construction time:
//!
//! - [`InputPort`] - raw level snapshot of port 0 (buttons, 1PPS input)
//! - [`PulseOutput`] - the pulse output pin and its routing
//! - [`CycleCounter`] - the free-running counter behind the time base
//! - [`DelayMs`] - millisecond delay timer
//! - [`WatchdogTimer`] - the deadman timer
//! - [`SystemControl`], [`DeviceInfo`], [`Bootloader`] - clock tree, reset pin,
//!   console routing and the in-system-programming interface
//!
//! A [`Board`] names one concrete type for each handle and hands them out as a
//! [`Peripherals`] bundle. Firmware targets implement it over the register
//! block; the simulator implements it over a virtual clock.
//!
//! All handle methods are infallible. The engine has no in-band error path:
//! a peripheral that misbehaves shows up as a wait that never resolves, which
//! the watchdog turns into a reset.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod board;
pub mod counter;
pub mod io;
pub mod pins;
pub mod system;

pub use board::{Board, Peripherals};
pub use counter::{CounterInput, CycleCounter};
pub use io::{InputPort, OutputRoute, PulseOutput};
pub use pins::{PinId, PinMask};
pub use system::{Bootloader, BootloaderVersion, DelayMs, DeviceInfo, SystemControl, WatchdogTimer};
