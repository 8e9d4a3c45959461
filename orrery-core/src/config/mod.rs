mod defaults;
mod error;
mod loader;

pub use defaults::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, DEFAULT_STEP_TIMEOUT_SECS};
pub use error::ConfigError;

use std::path::Path;
use std::time::Duration;

/// Engine settings loaded from `config/engine.toml`.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Budget for one provider invocation. Providers may be remote, so the
    /// default is generous.
    pub step_timeout_secs: u64,
    /// Optional budget for the whole plan; calls not yet started when it
    /// elapses are cancelled, in-flight calls drain.
    pub plan_timeout_secs: Option<u64>,
}

impl EngineConfig {
    /// Load configuration from a file path (or the default path if None).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        loader::load_config(path)
    }

    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }

    pub fn plan_timeout(&self) -> Option<Duration> {
        self.plan_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_timeout_secs: defaults::DEFAULT_STEP_TIMEOUT_SECS,
            plan_timeout_secs: None,
        }
    }
}
