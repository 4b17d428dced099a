//! Once-per-second watchdog feeding.

/// Fires once each time the phase drops below a threshold.
///
/// The phase falls below the threshold right after every wrap and stays
/// above it for the rest of the second, so the edge fires once per second
/// however often it is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedEdge {
    threshold: u32,
    armed: bool,
}

impl FeedEdge {
    /// An armed edge at `threshold` counts.
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            armed: true,
        }
    }

    /// Observe the phase. Returns `true` when the watchdog should be fed.
    pub fn observe(&mut self, phase: u32) -> bool {
        if self.armed && phase < self.threshold {
            self.armed = false;
            return true;
        }
        if !self.armed && phase > self.threshold {
            self.armed = true;
        }
        false
    }
}
