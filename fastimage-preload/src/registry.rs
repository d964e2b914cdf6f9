use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::batch::{PreloadBatch, ReportStatus};
use crate::error::BatchError;
use crate::outcome::Outcome;
use crate::sink::CompletionSink;

/// Open batches addressable by id.
///
/// For callers that can only carry a key across a callback boundary. The map
/// lock is held only to look a batch up; the report itself runs under that
/// batch's own lock.
#[derive(Clone, Default)]
pub struct PreloadRegistry {
    batches: Arc<DashMap<Uuid, Arc<PreloadBatch>>>,
}

impl PreloadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a batch and return its id.
    ///
    /// Empty batches resolve immediately and are never registered, so their
    /// id is only useful for logging: reporting to it yields
    /// [`BatchError::UnknownBatch`], the same as for any batch that has
    /// already resolved and left the registry.
    pub fn begin(&self, total: usize, sink: impl CompletionSink) -> Result<Uuid, BatchError> {
        let batch = PreloadBatch::new(total, sink)?;
        let batch_id = batch.id();
        if !batch.is_resolved() {
            self.batches.insert(batch_id, Arc::new(batch));
            tracing::debug!(
                batch_id = %batch_id,
                active = self.batches.len(),
                "Registered preload"
            );
        }
        Ok(batch_id)
    }

    /// Report one outcome to the batch registered under `batch_id`.
    ///
    /// Resolved batches are dropped from the registry, so late reports get
    /// `UnknownBatch` rather than the `AlreadyResolved` a [`PreloadBatch`]
    /// handle would return.
    pub fn report(&self, batch_id: Uuid, outcome: Outcome) -> Result<ReportStatus, BatchError> {
        // Clone the handle out so the shard lock is not held while reporting
        let batch = self
            .get(batch_id)
            .ok_or(BatchError::UnknownBatch { batch_id })
            .inspect_err(|_| {
                tracing::warn!(batch_id = %batch_id, "Report for unknown preload, discarding");
            })?;

        let result = batch.report(outcome);
        if batch.is_resolved() {
            self.batches.remove(&batch_id);
            tracing::debug!(batch_id = %batch_id, "Preload removed from registry");
        }
        result
    }

    pub fn get(&self, batch_id: Uuid) -> Option<Arc<PreloadBatch>> {
        self.batches.get(&batch_id).map(|b| b.clone())
    }

    /// Number of batches still waiting for reports
    pub fn active_count(&self) -> usize {
        self.batches.len()
    }
}
