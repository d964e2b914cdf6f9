use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::LoadError;
use crate::loader::ImageLoader;
use crate::source::ImageSource;

/// What the mock does when asked to load a uri
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Succeed,
    Fail(String),
    Panic,
    /// Never completes
    Hang,
}

/// Scripted image loader for tests (no network, no caches)
///
/// Unscripted uris succeed. Every load can be delayed, and the loader tracks
/// how many loads ran at the same time.
#[derive(Clone, Default)]
pub struct MockLoader {
    behaviors: Arc<Mutex<HashMap<String, MockBehavior>>>,
    delay: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    loads: Arc<AtomicUsize>,
    started: Arc<Mutex<Vec<String>>>,
    memory_clears: Arc<AtomicUsize>,
    disk_clears: Arc<AtomicUsize>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn script(self, uri: impl Into<String>, behavior: MockBehavior) -> Self {
        self.behaviors
            .lock()
            .unwrap()
            .insert(uri.into(), behavior);
        self
    }

    pub fn fail(self, uri: impl Into<String>, detail: impl Into<String>) -> Self {
        self.script(uri, MockBehavior::Fail(detail.into()))
    }

    /// Number of loads started so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Uris in the order their loads started
    pub fn started_uris(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    /// Highest number of loads observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn memory_clears(&self) -> usize {
        self.memory_clears.load(Ordering::SeqCst)
    }

    pub fn disk_clears(&self) -> usize {
        self.disk_clears.load(Ordering::SeqCst)
    }

    fn behavior_for(&self, uri: &str) -> MockBehavior {
        self.behaviors
            .lock()
            .unwrap()
            .get(uri)
            .cloned()
            .unwrap_or(MockBehavior::Succeed)
    }
}

/// Decrements the in-flight count even when a load panics
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ImageLoader for MockLoader {
    fn load<'a>(&'a self, source: &'a ImageSource) -> BoxFuture<'a, Result<(), LoadError>> {
        async move {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.started.lock().unwrap().push(source.uri.clone());
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            let _in_flight = InFlight(&self.in_flight);
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            match self.behavior_for(&source.uri) {
                MockBehavior::Succeed => Ok(()),
                MockBehavior::Fail(detail) => Err(LoadError::Other(detail)),
                MockBehavior::Panic => panic!("mock loader panicked on {}", source.uri),
                MockBehavior::Hang => futures::future::pending().await,
            }
        }
        .boxed()
    }

    fn clear_memory_cache(&self) -> BoxFuture<'_, Result<(), LoadError>> {
        self.memory_clears.fetch_add(1, Ordering::SeqCst);
        futures::future::ready(Ok(())).boxed()
    }

    fn clear_disk_cache(&self) -> BoxFuture<'_, Result<(), LoadError>> {
        self.disk_clears.fetch_add(1, Ordering::SeqCst);
        futures::future::ready(Ok(())).boxed()
    }
}

/// Sources for `count` uris of the form `mock://image/{i}`
pub fn mock_sources(count: usize) -> Vec<ImageSource> {
    (0..count)
        .map(|i| ImageSource::new(mock_uri(i)))
        .collect()
}

pub fn mock_uri(i: usize) -> String {
    format!("mock://image/{}", i)
}
