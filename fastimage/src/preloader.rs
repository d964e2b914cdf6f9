use fastimage_preload::{BatchError, Outcome, PreloadBatch, PreloadSummary};
use std::cmp::Reverse;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{oneshot, Semaphore};
use uuid::Uuid;

use crate::error::PreloadError;
use crate::loader::ImageLoader;
use crate::settings::Settings;
use crate::source::ImageSource;

/// Runs preload requests against an [`ImageLoader`].
///
/// Every call to [`Preloader::preload`] gets its own batch; concurrent
/// requests only share the loader and the concurrency limit.
pub struct Preloader<L: ImageLoader> {
    loader: Arc<L>,
    permits: Arc<Semaphore>,
}

impl<L: ImageLoader> Clone for Preloader<L> {
    fn clone(&self) -> Self {
        Self {
            loader: self.loader.clone(),
            permits: self.permits.clone(),
        }
    }
}

impl<L: ImageLoader> Preloader<L> {
    pub fn new(loader: L, settings: &Settings) -> Self {
        Self::with_concurrency(loader, settings.max_concurrent_loads)
    }

    pub fn with_concurrency(loader: L, max_concurrent_loads: usize) -> Self {
        Self {
            loader: Arc::new(loader),
            permits: Arc::new(Semaphore::new(max_concurrent_loads.max(1))),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Start loading all `sources` and return a handle resolving to the tally.
    ///
    /// Loads start in descending priority, input order within a priority.
    /// Must be called from within a Tokio runtime. Loads keep running if the
    /// handle is dropped; the result is then logged and discarded.
    pub fn preload(&self, mut sources: Vec<ImageSource>) -> PreloadHandle {
        let (tx, rx) = oneshot::channel();
        let batch = match PreloadBatch::new(sources.len(), tx) {
            Ok(batch) => Arc::new(batch),
            Err(e) => return PreloadHandle::failed(e),
        };
        let batch_id = batch.id();
        tracing::info!(
            batch_id = %batch_id,
            count = sources.len(),
            "Preload {} started",
            batch_id
        );

        // Stable, and the semaphore hands out permits in request order
        sources.sort_by_key(|source| Reverse(source.priority));

        for source in sources {
            let loader = self.loader.clone();
            let permits = self.permits.clone();
            let guard = ReportGuard::new(batch.clone());

            tokio::spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(permit) => {
                        let result = loader.load(&source).await;
                        drop(permit);
                        if let Err(e) = &result {
                            tracing::debug!(uri = %source.uri, "Load failed: {}", e);
                        }
                        Outcome::from(result)
                    }
                    Err(_) => Outcome::failure("preloader closed before load started"),
                };
                guard.report(outcome);
            });
        }

        PreloadHandle {
            batch_id,
            state: HandleState::Waiting(rx),
        }
    }

    /// Stop starting loads. Loads still waiting for a permit, here or in any
    /// clone, are reported as skipped; running loads finish normally.
    pub fn close(&self) {
        tracing::info!("Closing preloader");
        self.permits.close();
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    pub async fn clear_memory_cache(&self) -> Result<(), PreloadError> {
        tracing::info!("Clearing memory cache");
        self.loader.clear_memory_cache().await?;
        Ok(())
    }

    pub async fn clear_disk_cache(&self) -> Result<(), PreloadError> {
        tracing::info!("Clearing disk cache");
        self.loader.clear_disk_cache().await?;
        Ok(())
    }
}

/// Reports a load's outcome to its batch exactly once.
///
/// A guard dropped without reporting (task aborted, loader panicked) counts
/// as a failure, so the batch still completes.
struct ReportGuard {
    batch: Option<Arc<PreloadBatch>>,
}

impl ReportGuard {
    fn new(batch: Arc<PreloadBatch>) -> Self {
        Self { batch: Some(batch) }
    }

    fn report(mut self, outcome: Outcome) {
        if let Some(batch) = self.batch.take() {
            report_to(&batch, outcome);
        }
    }
}

impl Drop for ReportGuard {
    fn drop(&mut self) {
        if let Some(batch) = self.batch.take() {
            report_to(&batch, Outcome::failure("load cancelled before completion"));
        }
    }
}

fn report_to(batch: &PreloadBatch, outcome: Outcome) {
    // Over-reports are already logged by the batch
    if let Err(e @ BatchError::Sink { .. }) = batch.report(outcome) {
        tracing::warn!(batch_id = %batch.id(), "Preload result not delivered: {}", e);
    }
}

enum HandleState {
    Waiting(oneshot::Receiver<PreloadSummary>),
    Failed(Option<BatchError>),
}

/// Pending result of [`Preloader::preload`]
pub struct PreloadHandle {
    batch_id: Uuid,
    state: HandleState,
}

impl PreloadHandle {
    fn failed(err: BatchError) -> Self {
        Self {
            batch_id: err.batch_id(),
            state: HandleState::Failed(Some(err)),
        }
    }

    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }
}

impl Future for PreloadHandle {
    type Output = Result<PreloadSummary, PreloadError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let batch_id = this.batch_id;
        match &mut this.state {
            HandleState::Waiting(rx) => Pin::new(rx)
                .poll(cx)
                .map(|result| result.map_err(|_| PreloadError::Abandoned { batch_id })),
            HandleState::Failed(err) => Poll::Ready(Err(match err.take() {
                Some(e) => PreloadError::Batch(e),
                None => PreloadError::Abandoned { batch_id },
            })),
        }
    }
}
