use futures::future::BoxFuture;

use crate::error::LoadError;
use crate::source::ImageSource;

/// The image library the bridge drives (production = HTTP loader, test = mock)
///
/// Implementations must eventually resolve every `load` future, either way;
/// a batch waits for all of its loads and has no timeout of its own.
pub trait ImageLoader: Send + Sync + 'static {
    /// Fetch a source into the loader's caches
    fn load<'a>(&'a self, source: &'a ImageSource) -> BoxFuture<'a, Result<(), LoadError>>;

    fn clear_memory_cache(&self) -> BoxFuture<'_, Result<(), LoadError>>;

    fn clear_disk_cache(&self) -> BoxFuture<'_, Result<(), LoadError>>;
}
