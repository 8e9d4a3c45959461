use super::EngineConfig;
use super::defaults::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use super::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub engine: RawEngine,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawEngine {
    pub step_timeout_secs: Option<u64>,
    pub plan_timeout_secs: Option<u64>,
}

/// Load and validate configuration from a file path.
///
/// An explicitly provided path must exist. The default path (or the
/// `ORRERY_CONFIG` override) is allowed to be absent; defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    match path {
        Some(path) => read_config(path),
        None => {
            let fallback = default_path();
            if fallback.exists() {
                read_config(&fallback)
            } else {
                debug!(path = %fallback.display(), "No engine config file, using defaults");
                Ok(EngineConfig::default())
            }
        }
    }
}

fn default_path() -> PathBuf {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            PathBuf::from(shellexpand::tilde(raw.trim()).into_owned())
        }
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

fn read_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    debug!(path = %path.display(), "Reading engine configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let parsed: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<EngineConfig, ConfigError> {
    let defaults = EngineConfig::default();
    let step_timeout_secs = parsed
        .engine
        .step_timeout_secs
        .unwrap_or(defaults.step_timeout_secs);
    if step_timeout_secs == 0 {
        return Err(ConfigError::ZeroStepTimeout);
    }

    Ok(EngineConfig {
        step_timeout_secs,
        plan_timeout_secs: parsed.engine.plan_timeout_secs,
    })
}
