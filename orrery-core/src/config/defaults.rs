pub const DEFAULT_STEP_TIMEOUT_SECS: u64 = 30;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/engine.toml";

/// Environment variable that overrides the default config path
pub const CONFIG_PATH_ENV: &str = "ORRERY_CONFIG";
