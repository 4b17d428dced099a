//! # pulsegen-input
//!
//! The three front-panel buttons and the 1PPS sync input.
//!
//! - [`ButtonMap`] binds seconds, minutes and hours to port lines and step
//!   sizes.
//! - [`InputController`] reads the port in one access and reports which
//!   buttons are pressed (active low) and whether sync is asserted (active
//!   high).
//! - [`ConfirmationCounter`] and [`PressClassifier`] turn repeated samples
//!   into decisions. Any sample that contradicts the awaited condition
//!   restarts the count, so a single glitch never completes a wait.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod button;
pub mod classify;
pub mod controller;
pub mod error;

pub use button::{Button, ButtonId, ButtonMap, PressedButtons};
pub use classify::{ConfirmationCounter, PressClassifier, PressKind};
pub use controller::{InputController, InputSnapshot};
pub use error::InputError;
