use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An image to preload, as sent by the application layer.
///
/// The uri is handed to the loader untouched; resolving it is the loader's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    pub uri: String,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub cache: CacheControl,
}

impl ImageSource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            headers: HashMap::new(),
            priority: Priority::default(),
            cache: CacheControl::default(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_cache(mut self, cache: CacheControl) -> Self {
        self.cache = cache;
        self
    }
}

/// Start order within a preload; variants are declared lowest first
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheControl {
    /// Cache forever, ignoring response headers
    #[default]
    Immutable,
    /// Follow the HTTP cache headers
    Web,
    /// Only serve from cache, never hit the network
    CacheOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_source() {
        let source: ImageSource =
            serde_json::from_str(r#"{"uri":"https://example.com/a.png"}"#).unwrap();
        assert_eq!(source, ImageSource::new("https://example.com/a.png"));
        assert_eq!(source.priority, Priority::Normal);
        assert_eq!(source.cache, CacheControl::Immutable);
    }

    #[test]
    fn deserialize_full_source() {
        let source: ImageSource = serde_json::from_str(
            r#"{
                "uri": "https://example.com/b.png",
                "headers": {"Authorization": "Bearer abc"},
                "priority": "high",
                "cache": "cacheOnly"
            }"#,
        )
        .unwrap();

        assert_eq!(
            source.headers.get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );
        assert_eq!(source.priority, Priority::High);
        assert_eq!(source.cache, CacheControl::CacheOnly);
    }

    #[test]
    fn priority_orders_low_to_high() {
        assert!(Priority::Low < Priority::Normal);
        assert!(Priority::Normal < Priority::High);
    }

    #[test]
    fn deserialize_rejects_missing_uri() {
        assert!(serde_json::from_str::<ImageSource>(r#"{"priority":"low"}"#).is_err());
    }
}
