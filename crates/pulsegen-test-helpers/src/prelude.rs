//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use pulsegen_test_helpers::prelude::*;
//! ```

pub use crate::bench::{
    Bench, FakeBoard, FakeCounter, FakeDelay, FakeOutput, FakePort, FakeSystem, FakeWatchdog,
    PulseShape,
};
pub use crate::must::{must, must_some, must_with};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
