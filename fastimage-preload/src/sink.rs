//! Destinations for a batch's final summary.

use tokio::sync::oneshot;

use crate::error::SinkError;
use crate::outcome::PreloadSummary;

/// Receives the final summary of a batch.
///
/// `resolve` consumes the sink, so a sink can be invoked at most once.
pub trait CompletionSink: Send + 'static {
    fn resolve(self: Box<Self>, summary: PreloadSummary) -> Result<(), SinkError>;
}

impl CompletionSink for oneshot::Sender<PreloadSummary> {
    fn resolve(self: Box<Self>, summary: PreloadSummary) -> Result<(), SinkError> {
        (*self).send(summary).map_err(|_| SinkError::Closed)
    }
}

/// Sink backed by a closure, see [`from_fn`]
pub struct FnSink<F> {
    f: F,
}

impl<F> CompletionSink for FnSink<F>
where
    F: FnOnce(PreloadSummary) -> Result<(), SinkError> + Send + 'static,
{
    fn resolve(self: Box<Self>, summary: PreloadSummary) -> Result<(), SinkError> {
        (self.f)(summary)
    }
}

pub fn from_fn<F>(f: F) -> FnSink<F>
where
    F: FnOnce(PreloadSummary) -> Result<(), SinkError> + Send + 'static,
{
    FnSink { f }
}
