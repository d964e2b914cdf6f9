//! Completion tracking for batches of image preloads.
//!
//! A [`PreloadBatch`] is created per preload request with the number of
//! loads it expects. Each load reports its [`Outcome`] once; the report that
//! completes the tally hands a [`PreloadSummary`] to the batch's
//! [`CompletionSink`] and every later report is rejected.

mod batch;
mod error;
mod outcome;
mod registry;
pub mod sink;

pub use batch::{PreloadBatch, ReportStatus};
pub use error::{BatchError, SinkError};
pub use outcome::{Outcome, PreloadSummary};
pub use registry::PreloadRegistry;
pub use sink::CompletionSink;
