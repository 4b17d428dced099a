//! Shared test utilities for pulsegen.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`bench`] - A scripted fake board driven by a virtual clock
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! pulsegen-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use pulsegen_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]

pub mod bench;
pub mod must;
pub mod prelude;

pub use must::*;
