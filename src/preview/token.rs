//! Direct Line token retrieval

use super::PreviewError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

/// Marker left in generated pages until a real endpoint is filled in
pub const TOKEN_ENDPOINT_PLACEHOLDER: &str = "YOUR_TOKEN_ENDPOINT_HERE";

const REGIONAL_SETTINGS_PATH: &str = "/powervirtualagents/regionalchannelsettings";

/// Anything able to turn a token endpoint into a Direct Line token
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self, endpoint: &str) -> Result<String, PreviewError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionalSettingsResponse {
    channel_urls_by_id: ChannelUrls,
}

#[derive(Debug, Deserialize)]
struct ChannelUrls {
    directline: String,
}

/// Resolved channel settings for a token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSettings {
    pub direct_line_url: String,
}

/// HTTP client for Copilot Studio token endpoints
pub struct TokenClient {
    client: Client,
}

impl TokenClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Parse an endpoint, rejecting blanks and the unfilled placeholder
    pub fn parse_endpoint(endpoint: &str) -> Result<Url, PreviewError> {
        let trimmed = endpoint.trim();
        if trimmed.is_empty() || trimmed == TOKEN_ENDPOINT_PLACEHOLDER {
            return Err(PreviewError::Configuration(
                "Token endpoint is not configured".to_string(),
            ));
        }
        Url::parse(trimmed).map_err(|e| PreviewError::InvalidUrl(format!("{}: {}", trimmed, e)))
    }

    /// Regional channel settings URL on the same host, carrying the endpoint's `api-version`
    pub fn regional_settings_url(endpoint: &str) -> Result<Url, PreviewError> {
        let endpoint = Self::parse_endpoint(endpoint)?;
        let api_version = endpoint
            .query_pairs()
            .find(|(k, _)| k == "api-version")
            .map(|(_, v)| v.into_owned())
            .ok_or_else(|| {
                PreviewError::Configuration(
                    "Token endpoint has no api-version query parameter".to_string(),
                )
            })?;

        let mut url = endpoint
            .join(REGIONAL_SETTINGS_PATH)
            .map_err(|e| PreviewError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .clear()
            .append_pair("api-version", &api_version);
        Ok(url)
    }

    /// Look up the regional Direct Line URL for an endpoint
    pub async fn fetch_channel_settings(&self, endpoint: &str) -> Result<ChannelSettings, PreviewError> {
        let url = Self::regional_settings_url(endpoint)?;
        debug!(url = %url, "fetching regional channel settings");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PreviewError::TokenEndpoint(format!("{}: {}", status, body)));
        }

        let settings: RegionalSettingsResponse = response.json().await?;
        Ok(ChannelSettings {
            direct_line_url: settings.channel_urls_by_id.directline,
        })
    }
}

impl Default for TokenClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenSource for TokenClient {
    async fn fetch_token(&self, endpoint: &str) -> Result<String, PreviewError> {
        let url = Self::parse_endpoint(endpoint)?;
        debug!(host = ?url.host_str(), "requesting Direct Line token");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "token endpoint rejected request");
            return Err(PreviewError::TokenEndpoint(format!("{}: {}", status, body)));
        }

        let body: TokenResponse = response.json().await?;
        if body.token.is_empty() {
            return Err(PreviewError::TokenEndpoint(
                "Response did not contain a token".to_string(),
            ));
        }
        Ok(body.token)
    }
}
