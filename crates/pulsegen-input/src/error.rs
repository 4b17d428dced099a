//! Button map and classifier errors.

use thiserror::Error;

/// Rejected input configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Step sizes must be strictly increasing from seconds to hours.
    #[error("button steps must be strictly increasing, got {0:?}")]
    StepsNotIncreasing([u32; 3]),

    /// A button would do nothing.
    #[error("button steps must be non-zero")]
    ZeroStep,

    /// Two buttons share a port line.
    #[error("buttons must use distinct port lines")]
    SharedLine,

    /// A sample-count threshold of zero.
    #[error("{0} must be at least one sample")]
    ZeroThreshold(&'static str),
}
