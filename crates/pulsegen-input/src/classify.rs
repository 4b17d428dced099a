//! Debounce by repetition.

use crate::error::InputError;

/// Counts consecutive samples that satisfy a condition.
///
/// Any sample that does not satisfy it restarts the count from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationCounter {
    required: u32,
    count: u32,
}

impl ConfirmationCounter {
    /// A counter that confirms after `required` consecutive samples.
    ///
    /// # Errors
    ///
    /// Returns an error if `required` is zero.
    pub fn new(required: u32) -> Result<Self, InputError> {
        if required == 0 {
            return Err(InputError::ZeroThreshold("confirmation count"));
        }
        Ok(Self { required, count: 0 })
    }

    /// Feed one sample. Returns `true` once confirmed.
    pub fn observe(&mut self, satisfied: bool) -> bool {
        if satisfied {
            self.count = self.count.saturating_add(1).min(self.required);
        } else {
            self.count = 0;
        }
        self.is_confirmed()
    }

    /// Whether the required streak has been seen.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.count >= self.required
    }

    /// Current streak length.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Streak needed to confirm.
    #[must_use]
    pub fn required(&self) -> u32 {
        self.required
    }

    /// Start over.
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// Outcome of a classified press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    /// Released before the hold threshold.
    Tap,
    /// Still pressed at the hold threshold.
    Hold,
}

/// Classifies one press as a tap or a hold from repeated samples.
///
/// A hold needs `hold_threshold` consecutive pressed samples; a tap needs
/// `release_samples` consecutive released samples first. Each kind of sample
/// restarts the other streak, so a lone release glitch during a long press
/// delays the hold decision instead of turning it into a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressClassifier {
    held: ConfirmationCounter,
    released: ConfirmationCounter,
}

impl PressClassifier {
    /// Create a classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if either threshold is zero.
    pub fn new(hold_threshold: u32, release_samples: u32) -> Result<Self, InputError> {
        Ok(Self {
            held: ConfirmationCounter::new(hold_threshold)?,
            released: ConfirmationCounter::new(release_samples)?,
        })
    }

    /// Feed one sample of the button. Returns the decision once made.
    pub fn observe(&mut self, pressed: bool) -> Option<PressKind> {
        if self.held.observe(pressed) {
            return Some(PressKind::Hold);
        }
        if self.released.observe(!pressed) {
            return Some(PressKind::Tap);
        }
        None
    }

    /// Consecutive pressed samples so far.
    #[must_use]
    pub fn held_samples(&self) -> u32 {
        self.held.count()
    }

    /// Start over for a new press.
    pub fn reset(&mut self) {
        self.held.reset();
        self.released.reset();
    }
}
