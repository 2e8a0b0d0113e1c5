//! Checkout stepper.
//!
//! Purely presentational: no I/O, just which of the four phases the user
//! is on and which are done.

use thiserror::Error;

/// The four checkout phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Review,
    Confirmation,
}

impl CheckoutStep {
    /// All steps in display order.
    pub const ALL: [Self; 4] = [
        Self::Shipping,
        Self::Payment,
        Self::Review,
        Self::Confirmation,
    ];

    /// Zero-based position in the stepper.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Shipping => 0,
            Self::Payment => 1,
            Self::Review => 2,
            Self::Confirmation => 3,
        }
    }
}

/// Errors from step navigation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepperError {
    /// Jumping past uncompleted steps is not allowed.
    #[error("cannot skip ahead to an uncompleted step")]
    ForwardSkip,
}

/// Stepper state for the checkout page.
#[derive(Debug)]
pub struct Stepper {
    current: CheckoutStep,
    marked: [bool; 4],
}

impl Stepper {
    /// Start at the shipping step with nothing completed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: CheckoutStep::Shipping,
            marked: [false; 4],
        }
    }

    /// The step the user is on.
    #[must_use]
    pub fn current(&self) -> CheckoutStep {
        self.current
    }

    /// Explicitly mark a step as completed.
    pub fn mark_completed(&mut self, step: CheckoutStep) {
        if let Some(slot) = self.marked.get_mut(step.index()) {
            *slot = true;
        }
    }

    /// A step counts as completed when explicitly marked or when its index
    /// precedes the current step.
    #[must_use]
    pub fn is_completed(&self, step: CheckoutStep) -> bool {
        let marked = self.marked.get(step.index()).copied().unwrap_or(false);

        marked || step.index() < self.current.index()
    }

    /// Mark the current step completed and move to the next one.
    pub fn advance(&mut self) {
        self.mark_completed(self.current);

        if let Some(next) = CheckoutStep::ALL.get(self.current.index() + 1) {
            self.current = *next;
        }
    }

    /// Navigate to a step. Backward to a completed step is allowed;
    /// skipping forward is not.
    ///
    /// # Errors
    ///
    /// Returns [`StepperError::ForwardSkip`] when the target is ahead of
    /// the current step and not completed.
    pub fn go_to(&mut self, step: CheckoutStep) -> Result<(), StepperError> {
        if step.index() > self.current.index() && !self.is_completed(step) {
            return Err(StepperError::ForwardSkip);
        }

        self.current = step;

        Ok(())
    }
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new()
    }
}
