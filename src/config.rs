//! Gateway configuration.

use serde::Deserialize;
use url::Url;

use crate::{Platform, PushError, Result};

/// Per-platform push configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    /// App key qualifying the gateway channel.
    pub app_key: String,
    /// Pre-issued access token; when set, the token exchange is skipped.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl PlatformConfig {
    /// Create a platform config with no pre-issued token.
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            access_token: None,
        }
    }

    /// Set a pre-issued access token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

/// IMC gateway configuration.
///
/// Validated eagerly: adapter construction fails with
/// [`PushError::Misconfigured`] when credentials are missing or an
/// endpoint URL is invalid.
#[derive(Debug, Clone)]
pub struct ImcConfig {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// OAuth refresh token exchanged for access tokens.
    pub refresh_token: String,
    /// Token exchange endpoint.
    pub oauth_token_request_url: String,
    /// Channel push send endpoint.
    pub rest_channels_push_sends_request_url: String,
    /// Campaign name stamped on every envelope.
    pub campaign_name: String,
    push_types: Vec<(Platform, PlatformConfig)>,
}

impl ImcConfig {
    /// Create a config with no platforms enabled yet.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
        oauth_token_request_url: impl Into<String>,
        rest_channels_push_sends_request_url: impl Into<String>,
        campaign_name: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            oauth_token_request_url: oauth_token_request_url.into(),
            rest_channels_push_sends_request_url: rest_channels_push_sends_request_url.into(),
            campaign_name: campaign_name.into(),
            push_types: Vec::new(),
        }
    }

    /// Enable a platform, replacing any existing config for it.
    pub fn platform(mut self, platform: Platform, config: PlatformConfig) -> Self {
        self.push_types.retain(|(p, _)| *p != platform);
        self.push_types.push((platform, config));
        self
    }

    /// Parse a config from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RawConfig {
            client_id: Option<String>,
            client_secret: Option<String>,
            refresh_token: Option<String>,
            oauth_token_request_url: Option<String>,
            rest_channels_push_sends_request_url: Option<String>,
            #[serde(default)]
            campaign_name: Option<String>,
            #[serde(default)]
            push_types: std::collections::BTreeMap<String, PlatformConfig>,
        }

        let raw: RawConfig = serde_json::from_str(json)
            .map_err(|e| PushError::Misconfigured(e.to_string()))?;

        let mut config = Self::new(
            raw.client_id.unwrap_or_default(),
            raw.client_secret.unwrap_or_default(),
            raw.refresh_token.unwrap_or_default(),
            raw.oauth_token_request_url.unwrap_or_default(),
            raw.rest_channels_push_sends_request_url.unwrap_or_default(),
            raw.campaign_name.unwrap_or_default(),
        );

        for (key, platform_config) in raw.push_types {
            let platform = Platform::parse(&key).ok_or_else(|| {
                PushError::Misconfigured(format!("Push to {key} is not supported"))
            })?;
            config = config.platform(platform, platform_config);
        }
        // JSON objects carry no order; fall back to the declared platform order.
        config.push_types.sort_by_key(|(p, _)| *p);

        config.validate()?;
        Ok(config)
    }

    /// Check that credentials are present and the endpoints are valid URLs.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_token.is_empty() || self.client_id.is_empty() || self.client_secret.is_empty()
        {
            return Err(PushError::Misconfigured(
                "Need to provide IMC clientId, clientSecret and refreshToken".to_string(),
            ));
        }
        for (name, value) in [
            ("oauthTokenRequestUrl", &self.oauth_token_request_url),
            (
                "restChannelsPushSendsRequestUrl",
                &self.rest_channels_push_sends_request_url,
            ),
        ] {
            Url::parse(value)
                .map_err(|e| PushError::Misconfigured(format!("Invalid {name}: {e}")))?;
        }
        Ok(())
    }

    /// Enabled platforms, in configuration order.
    pub fn platforms(&self) -> Vec<Platform> {
        self.push_types.iter().map(|(p, _)| *p).collect()
    }

    /// Config for one platform, if enabled.
    pub fn platform_config(&self, platform: Platform) -> Option<&PlatformConfig> {
        self.push_types
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, c)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ImcConfig {
        ImcConfig::new(
            "cid",
            "secret",
            "rtok",
            "https://oauth.example.com/token",
            "https://gateway.example.com/channels/sends",
            "camp",
        )
        .platform(Platform::Ios, PlatformConfig::new("ios-app"))
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let mut config = valid();
        config.refresh_token = String::new();
        assert!(matches!(
            config.validate(),
            Err(PushError::Misconfigured(_))
        ));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let mut config = valid();
        config.oauth_token_request_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(PushError::Misconfigured(_))
        ));
    }

    #[test]
    fn test_from_json() {
        let config = ImcConfig::from_json(
            r#"{
                "clientId": "cid",
                "clientSecret": "secret",
                "refreshToken": "rtok",
                "oauthTokenRequestUrl": "https://oauth.example.com/token",
                "restChannelsPushSendsRequestUrl": "https://gateway.example.com/sends",
                "campaignName": "camp",
                "pushTypes": {
                    "ios": {"appKey": "ios-app"},
                    "android": {"appKey": "and-app", "accessToken": "pre"}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.platforms(), vec![Platform::Ios, Platform::Android]);
        assert_eq!(
            config
                .platform_config(Platform::Android)
                .unwrap()
                .access_token
                .as_deref(),
            Some("pre")
        );
    }

    #[test]
    fn test_from_json_rejects_unsupported_platform() {
        let err = ImcConfig::from_json(
            r#"{
                "clientId": "cid",
                "clientSecret": "secret",
                "refreshToken": "rtok",
                "oauthTokenRequestUrl": "https://oauth.example.com/token",
                "restChannelsPushSendsRequestUrl": "https://gateway.example.com/sends",
                "pushTypes": {"web": {"appKey": "w"}}
            }"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_from_json_rejects_missing_credentials() {
        let err = ImcConfig::from_json(r#"{"clientId": "cid"}"#).unwrap_err();
        assert!(matches!(err, PushError::Misconfigured(_)));
    }

    #[test]
    fn test_platform_replaces_existing_entry() {
        let config = valid().platform(Platform::Ios, PlatformConfig::new("other"));
        assert_eq!(config.platforms(), vec![Platform::Ios]);
        assert_eq!(
            config.platform_config(Platform::Ios).unwrap().app_key,
            "other"
        );
    }
}
