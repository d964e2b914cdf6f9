use futures::future::{BoxFuture, FutureExt};
use std::time::Duration;

use crate::error::LoadError;
use crate::loader::ImageLoader;
use crate::settings::Settings;
use crate::source::{CacheControl, ImageSource};

/// Loader that fetches sources over HTTP(S) and discards the body.
///
/// It keeps no cache of its own, so it only warms whatever HTTP caches sit
/// between the process and the origin. The request timeout guarantees every
/// load settles.
#[derive(Clone)]
pub struct HttpLoader {
    client: reqwest::Client,
}

impl HttpLoader {
    pub fn new(settings: &Settings) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    async fn fetch(&self, source: &ImageSource) -> Result<(), LoadError> {
        if source.cache == CacheControl::CacheOnly {
            return Err(LoadError::Unsupported(format!(
                "{} is cache-only and this loader has no cache",
                source.uri
            )));
        }

        let mut request = self.client.get(&source.uri);
        for (name, value) in &source.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        tracing::debug!(uri = %source.uri, bytes = body.len(), "Fetched image");
        Ok(())
    }
}

impl ImageLoader for HttpLoader {
    fn load<'a>(&'a self, source: &'a ImageSource) -> BoxFuture<'a, Result<(), LoadError>> {
        self.fetch(source).boxed()
    }

    fn clear_memory_cache(&self) -> BoxFuture<'_, Result<(), LoadError>> {
        async {
            tracing::debug!("HTTP loader holds no memory cache");
            Ok(())
        }
        .boxed()
    }

    fn clear_disk_cache(&self) -> BoxFuture<'_, Result<(), LoadError>> {
        async {
            tracing::debug!("HTTP loader holds no disk cache");
            Ok(())
        }
        .boxed()
    }
}
