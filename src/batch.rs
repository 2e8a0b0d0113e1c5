//! Batch outcomes for multi-record operations.

/// Result of attempting several independent sub-operations.
///
/// Each input is attempted regardless of earlier failures; nothing already
/// persisted is rolled back. Callers inspect `failed` and retry those
/// inputs individually.
#[derive(Debug)]
pub struct BatchOutcome<T, I, E> {
    /// Successfully created/updated records, in attempt order.
    pub succeeded: Vec<T>,

    /// Inputs that failed, paired with the error that stopped them.
    pub failed: Vec<(I, E)>,
}

impl<T, I, E> BatchOutcome<T, I, E> {
    /// An outcome with no attempts recorded yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Record one attempt.
    pub fn record(&mut self, input: I, result: Result<T, E>) {
        match result {
            Ok(value) => self.succeeded.push(value),
            Err(error) => self.failed.push((input, error)),
        }
    }

    /// Whether every attempt succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl<T, I, E> Default for BatchOutcome<T, I, E> {
    fn default() -> Self {
        Self::new()
    }
}
