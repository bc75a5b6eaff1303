//! Space-Track HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::{ElementSnapshot, OrbitSource, SpaceTrackError};
use crate::config::SpaceTrackConfig;

/// Form login endpoint. Sets the session cookie.
pub const LOGIN_PATH: &str = "/ajaxauth/login";

/// Latest element set per object, epochs within the last 30 days, ordered by
/// catalog id.
pub const LATEST_ELEMENTS_PATH: &str =
    "/basicspacedata/query/class/tle_latest/ORDINAL/1/orderby/NORAD_CAT_ID/epoch/%3Enow-30/format/json";

/// Client for the Space-Track API.
///
/// The session cookie set by [`LOGIN_PATH`] lives in the client's cookie
/// jar and is sent with every later request.
pub struct SpaceTrackClient {
    client: Client,
    config: SpaceTrackConfig,
}

impl SpaceTrackClient {
    pub fn new(config: SpaceTrackConfig) -> Result<Self, SpaceTrackError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

#[async_trait]
impl OrbitSource for SpaceTrackClient {
    async fn login(&self) -> Result<(), SpaceTrackError> {
        let url = format!("{}{}", self.base_url(), LOGIN_PATH);
        let params = [
            ("identity", self.config.identity.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let response = self.client.post(&url).form(&params).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() && !body.contains("Failed") {
            debug!(identity = %self.config.identity, "Space-Track login successful");
            Ok(())
        } else if status.is_success() || status.as_u16() == 401 {
            Err(SpaceTrackError::AuthenticationFailed(
                "Invalid credentials".to_string(),
            ))
        } else {
            Err(SpaceTrackError::AuthenticationFailed(format!(
                "Unexpected response: HTTP {} {}",
                status.as_u16(),
                body.chars().take(100).collect::<String>()
            )))
        }
    }

    async fn latest_elements(&self) -> Result<Vec<ElementSnapshot>, SpaceTrackError> {
        let url = format!("{}{}", self.base_url(), LATEST_ELEMENTS_PATH);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(SpaceTrackError::AuthenticationFailed(
                "Session rejected".to_string(),
            ));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpaceTrackError::ApiError {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        let snapshots: Vec<ElementSnapshot> = serde_json::from_str(&body)
            .map_err(|e| SpaceTrackError::ParseError(e.to_string()))?;

        info!(count = snapshots.len(), "Fetched latest orbital elements");
        Ok(snapshots)
    }
}
