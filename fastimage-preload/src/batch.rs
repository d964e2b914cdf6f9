use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::error::BatchError;
use crate::outcome::{Outcome, PreloadSummary};
use crate::sink::CompletionSink;

/// What a single report did to its batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    /// Still waiting on `remaining` loads
    Pending { remaining: usize },
    /// This report completed the batch and the summary was delivered
    Resolved(PreloadSummary),
}

enum BatchState {
    Open {
        succeeded: usize,
        failed: usize,
        sink: Box<dyn CompletionSink>,
    },
    Resolved(PreloadSummary),
}

/// Tally of one preload request.
///
/// Reports may arrive from any thread in any order. The increment, the
/// completeness check and the hand-off of the sink happen under one
/// per-batch lock, so exactly one report resolves the batch.
pub struct PreloadBatch {
    id: Uuid,
    total: usize,
    state: Mutex<BatchState>,
}

impl PreloadBatch {
    /// Start a batch expecting `total` reports.
    ///
    /// An empty batch is resolved with `(0, 0)` before this returns; the only
    /// error is that delivery failing.
    pub fn new(total: usize, sink: impl CompletionSink) -> Result<Self, BatchError> {
        let id = Uuid::new_v4();
        tracing::debug!(batch_id = %id, total, "Preload started");

        if total == 0 {
            let summary = PreloadSummary::default();
            let batch = Self {
                id,
                total,
                state: Mutex::new(BatchState::Resolved(summary)),
            };
            batch.deliver(Box::new(sink), summary)?;
            return Ok(batch);
        }

        Ok(Self {
            id,
            total,
            state: Mutex::new(BatchState::Open {
                succeeded: 0,
                failed: 0,
                sink: Box::new(sink),
            }),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.lock(), BatchState::Resolved(_))
    }

    /// Current tally (final once resolved)
    pub fn summary(&self) -> PreloadSummary {
        match &*self.lock() {
            BatchState::Open {
                succeeded, failed, ..
            } => PreloadSummary::new(*succeeded, *failed),
            BatchState::Resolved(summary) => *summary,
        }
    }

    /// Record the outcome of one load.
    ///
    /// Reports after resolution are logged and rejected without touching the
    /// tally. A delivery failure is returned to the reporter that completed
    /// the batch; the batch is resolved either way.
    pub fn report(&self, outcome: Outcome) -> Result<ReportStatus, BatchError> {
        let (sink, summary) = {
            let mut state = self.lock();
            let BatchState::Open {
                succeeded, failed, ..
            } = &mut *state
            else {
                tracing::warn!(batch_id = %self.id, "Report after preload resolved, discarding");
                return Err(BatchError::AlreadyResolved { batch_id: self.id });
            };

            match &outcome {
                Outcome::Success => *succeeded += 1,
                Outcome::Failure(detail) => {
                    tracing::warn!(batch_id = %self.id, "Preload item failed: {}", detail);
                    *failed += 1;
                }
            }

            let summary = PreloadSummary::new(*succeeded, *failed);
            if summary.total() < self.total {
                return Ok(ReportStatus::Pending {
                    remaining: self.total - summary.total(),
                });
            }

            // Still Open: the lock has been held since the match above
            let BatchState::Open { sink, .. } =
                std::mem::replace(&mut *state, BatchState::Resolved(summary))
            else {
                return Err(BatchError::AlreadyResolved { batch_id: self.id });
            };
            (sink, summary)
        };

        self.deliver(sink, summary)?;
        Ok(ReportStatus::Resolved(summary))
    }

    fn deliver(
        &self,
        sink: Box<dyn CompletionSink>,
        summary: PreloadSummary,
    ) -> Result<(), BatchError> {
        tracing::info!(
            batch_id = %self.id,
            finished = summary.finished_count,
            skipped = summary.skipped_count,
            "Preload done: {} of {} images preloaded",
            summary.finished_count,
            self.total
        );
        sink.resolve(summary).map_err(|source| BatchError::Sink {
            batch_id: self.id,
            source,
        })
    }

    // The state is only written after every fallible step, so a poisoned
    // lock still holds a consistent tally.
    fn lock(&self) -> MutexGuard<'_, BatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for PreloadBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreloadBatch")
            .field("id", &self.id)
            .field("total", &self.total)
            .field("summary", &self.summary())
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
