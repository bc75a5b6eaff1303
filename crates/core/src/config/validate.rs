use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Space-Track credentials and URL, when the section is present
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(space_track) = &config.space_track {
        if space_track.identity.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "space_track.identity cannot be empty".to_string(),
            ));
        }
        if space_track.password.is_empty() {
            return Err(ConfigError::ValidationError(
                "space_track.password cannot be empty".to_string(),
            ));
        }
        if !space_track.base_url.starts_with("http://")
            && !space_track.base_url.starts_with("https://")
        {
            return Err(ConfigError::ValidationError(format!(
                "space_track.base_url must be an http(s) URL, got '{}'",
                space_track.base_url
            )));
        }
        if space_track.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "space_track.timeout_secs cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}
