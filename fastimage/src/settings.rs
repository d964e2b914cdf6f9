use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_max_concurrent_loads")]
    pub max_concurrent_loads: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub log_to_file: bool,
}

fn default_max_concurrent_loads() -> usize {
    8
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("fastimage/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_concurrent_loads: default_max_concurrent_loads(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            log_to_file: false,
        }
    }
}

impl Settings {
    /// Load from `path` (optional) layered under `FASTIMAGE__*` env vars
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("FASTIMAGE").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_loads == 0 {
            return Err("max_concurrent_loads must be at least 1".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be at least 1".to_string());
        }
        if self.user_agent.is_empty() {
            return Err("user_agent is required".to_string());
        }
        Ok(())
    }
}
