//! Aggregation of per-file outcomes for multi-file requests.

use crate::job::{StoredFile, UploadOutcome};

/// One file that could not be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub original_name: String,
    /// Human-readable cause, suitable for the HTTP response.
    pub reason: String,
}

/// Overall result of a multi-file submission.
///
/// Each file is an independent job; this only collects their outcomes.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub stored: Vec<StoredFile>,
    pub failed: Vec<FailedFile>,
}

/// Batch-level status derived from the per-file tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every file persisted.
    Complete,
    /// At least one file persisted and at least one failed.
    Partial,
    /// No file persisted.
    Failed,
}

impl BatchOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one file's outcome. For errors, `original_name` is the name
    /// the caller declared for that file.
    pub fn record(&mut self, original_name: &str, outcome: UploadOutcome) {
        match outcome {
            Ok(stored) => self.stored.push(stored),
            Err(e) => self.failed.push(FailedFile {
                original_name: original_name.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn status(&self) -> BatchStatus {
        if self.failed.is_empty() {
            BatchStatus::Complete
        } else if self.stored.is_empty() {
            BatchStatus::Failed
        } else {
            BatchStatus::Partial
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_empty() && self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{StoredFile, UploadError};

    fn stored(name: &str) -> StoredFile {
        StoredFile {
            stored_name: name.to_string(),
            original_name: name.to_string(),
        }
    }

    #[test]
    fn all_successes_is_complete() {
        let mut batch = BatchOutcome::new();
        batch.record("a.png", Ok(stored("a.png")));
        batch.record("b.png", Ok(stored("b.png")));
        assert_eq!(batch.status(), BatchStatus::Complete);
        assert_eq!(batch.stored.len(), 2);
    }

    #[test]
    fn mixed_outcomes_are_partial() {
        let mut batch = BatchOutcome::new();
        batch.record("a.png", Ok(stored("a.png")));
        batch.record("b.png", Err(UploadError::QueueFull));
        assert_eq!(batch.status(), BatchStatus::Partial);
        assert_eq!(batch.failed[0].original_name, "b.png");
        assert!(!batch.failed[0].reason.is_empty());
    }

    #[test]
    fn all_failures_is_failed() {
        let mut batch = BatchOutcome::new();
        batch.record("a.png", Err(UploadError::QueueFull));
        assert_eq!(batch.status(), BatchStatus::Failed);
    }

    #[test]
    fn empty_batch_is_complete_and_empty() {
        let batch = BatchOutcome::new();
        assert!(batch.is_empty());
        assert_eq!(batch.status(), BatchStatus::Complete);
    }
}
