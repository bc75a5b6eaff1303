use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub space_track: Option<SpaceTrackConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Launch store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("launchlog.db")
}

/// Space-Track (external orbit catalog) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpaceTrackConfig {
    /// Login identity (account e-mail)
    #[serde(deserialize_with = "scalar_string")]
    pub identity: String,
    /// Account password
    #[serde(deserialize_with = "scalar_string")]
    pub password: String,
    /// Base URL (default: https://www.space-track.org)
    #[serde(default = "default_space_track_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 60)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Accept any scalar as a string. Environment values arrive typed, so an
/// all-digit password shows up as an integer.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarVisitor;

    impl Visitor<'_> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

fn default_space_track_url() -> String {
    "https://www.space-track.org".to_string()
}

fn default_timeout() -> u32 {
    60
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_track: Option<SanitizedSpaceTrackConfig>,
}

/// Sanitized Space-Track config (password hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSpaceTrackConfig {
    pub base_url: String,
    pub identity: String,
    pub password_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            space_track: config
                .space_track
                .as_ref()
                .map(|st| SanitizedSpaceTrackConfig {
                    base_url: st.base_url.clone(),
                    identity: st.identity.clone(),
                    password_configured: !st.password.is_empty(),
                    timeout_secs: st.timeout_secs,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "launchlog.db");
        assert!(config.space_track.is_none());
    }

    #[test]
    fn test_deserialize_with_custom_database_path() {
        let toml = r#"
[database]
path = "/data/spacex.sqlite"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "/data/spacex.sqlite");
    }

    #[test]
    fn test_deserialize_space_track_defaults() {
        let toml = r#"
[space_track]
identity = "ops@example.com"
password = "secret"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let st = config.space_track.unwrap();
        assert_eq!(st.base_url, "https://www.space-track.org");
        assert_eq!(st.timeout_secs, 60);
    }

    #[test]
    fn test_deserialize_space_track_missing_password_fails() {
        let toml = r#"
[space_track]
identity = "ops@example.com"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_space_track_scalar_credentials() {
        let toml = r#"
[space_track]
identity = 42
password = 12345
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let st = config.space_track.unwrap();
        assert_eq!(st.identity, "42");
        assert_eq!(st.password, "12345");
    }

    #[test]
    fn test_deserialize_space_track_table_password_fails() {
        let toml = r#"
[space_track]
identity = "ops@example.com"
password = { nested = true }
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitized_config_hides_password() {
        let config = Config {
            space_track: Some(SpaceTrackConfig {
                identity: "ops@example.com".to_string(),
                password: "secret".to_string(),
                base_url: default_space_track_url(),
                timeout_secs: 10,
            }),
            ..Config::default()
        };

        let sanitized = SanitizedConfig::from(&config);
        let st = sanitized.space_track.as_ref().unwrap();
        assert!(st.password_configured);
        assert_eq!(st.identity, "ops@example.com");

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_sanitized_config_without_space_track() {
        let sanitized = SanitizedConfig::from(&Config::default());
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("space_track"));
        assert_eq!(sanitized.server.port, 8080);
    }
}
