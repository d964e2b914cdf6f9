use serde::{Deserialize, Serialize};

/// Result of a single load within a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The load failed. The detail is only logged, never inspected.
    Failure(String),
}

impl Outcome {
    pub fn failure(detail: impl Into<String>) -> Self {
        Outcome::Failure(detail.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for Outcome {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::Failure(e.to_string()),
        }
    }
}

/// Final tally of a batch, in the shape the application layer expects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloadSummary {
    pub finished_count: usize,
    pub skipped_count: usize,
}

impl PreloadSummary {
    pub fn new(finished_count: usize, skipped_count: usize) -> Self {
        Self {
            finished_count,
            skipped_count,
        }
    }

    pub fn total(&self) -> usize {
        self.finished_count + self.skipped_count
    }
}
