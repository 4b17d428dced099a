//! Prelude for pulsegen-watchdog.
//!
//! ```rust
//! use pulsegen_watchdog::prelude::*;
//!
//! let deadman = SoftwareWatchdog::new();
//! deadman.start(100);
//! deadman.feed();
//! assert!(deadman.is_armed());
//! ```

pub use crate::config::WatchdogConfig;
pub use crate::error::{WatchdogError, WatchdogResult};
pub use crate::guard::WatchdogGuard;
pub use crate::software_impl::SoftwareWatchdog;
pub use crate::state::{WatchdogMetrics, WatchdogState, WatchdogStatus};
pub use pulsegen_hal::WatchdogTimer;
