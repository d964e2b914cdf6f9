pub mod error;
pub mod http;
pub mod loader;
pub mod logging;
pub mod preloader;
pub mod settings;
pub mod source;

pub use error::{LoadError, PreloadError};
pub use fastimage_preload::PreloadSummary;
pub use http::HttpLoader;
pub use loader::ImageLoader;
pub use preloader::{PreloadHandle, Preloader};
pub use settings::Settings;
pub use source::{CacheControl, ImageSource, Priority};

// Always expose testing module (integration tests need it)
pub mod testing;
