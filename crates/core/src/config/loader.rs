use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `LAUNCHLOG_SPACE_TRACK__PASSWORD`.
pub const ENV_PREFIX: &str = "LAUNCHLOG_";

/// Keys whose environment values are taken verbatim instead of being parsed
/// as typed data (`007` must not become `7`).
const VERBATIM_KEYS: &[&str] = &["space_track.identity", "space_track.password"];

/// Merge `prefix`-ed environment variables into `figment`.
///
/// Nested keys are separated by a double underscore so that section names
/// like `space_track` survive the split.
fn merge_env(figment: Figment, prefix: &str) -> Figment {
    let mut figment = figment.merge(Env::prefixed(prefix).split("__"));
    for key in VERBATIM_KEYS {
        let var = format!("{}{}", prefix, key.to_uppercase().replace('.', "__"));
        if let Ok(raw) = std::env::var(&var) {
            figment = figment.merge(Serialized::default(key, raw));
        }
    }
    figment
}

fn extract_from_env(prefix: &str) -> Result<Config, ConfigError> {
    merge_env(Figment::new(), prefix)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = merge_env(Figment::new().merge(Toml::file(path)), ENV_PREFIX)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from the environment only.
///
/// Used by the orbit sync job, which is normally invoked from a scheduler
/// with nothing but environment variables.
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    extract_from_env(ENV_PREFIX)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
