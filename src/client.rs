//! Gateway HTTP client.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::{GatewayEnvelope, ImcConfig, PushError, Result, TokenResponse};

/// The gateway's two network operations, behind a seam so dispatch can
/// be exercised without a live gateway.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Obtain an access token.
    ///
    /// A supplied token is returned as-is with no network call and no
    /// validation; otherwise a refresh-token grant is exchanged at the
    /// configured token endpoint.
    async fn auth(&self, supplied_token: Option<&str>) -> Result<TokenResponse>;

    /// Submit an envelope to the send endpoint with a bearer token.
    ///
    /// Returns the response body uninterpreted; acceptance by the
    /// gateway says nothing about per-device delivery.
    async fn publish(
        &self,
        envelope: &GatewayEnvelope,
        access_token: &str,
    ) -> Result<serde_json::Value>;
}

/// Reqwest-backed gateway client.
pub struct ImcClient {
    config: ImcConfig,
    client: Client,
}

impl ImcClient {
    /// Create a client, validating the configuration eagerly.
    pub fn new(config: ImcConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PushError::Misconfigured(e.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl Gateway for ImcClient {
    async fn auth(&self, supplied_token: Option<&str>) -> Result<TokenResponse> {
        if let Some(token) = supplied_token {
            return Ok(TokenResponse::supplied(token));
        }

        let response = self
            .client
            .post(&self.config.oauth_token_request_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", self.config.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(PushError::AuthTransport)?;

        let body = response.text().await.map_err(PushError::AuthTransport)?;
        debug!(body = %body, "push auth result");

        // The token endpoint reports logical failures in the body; a
        // parsed response without access_token is handled downstream.
        serde_json::from_str(&body).map_err(|e| PushError::AuthResponseParse(e.to_string()))
    }

    async fn publish(
        &self,
        envelope: &GatewayEnvelope,
        access_token: &str,
    ) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.config.rest_channels_push_sends_request_url)
            .header("Authorization", format!("Bearer {access_token}"))
            .json(envelope)
            .send()
            .await
            .map_err(|e| PushError::PublishTransport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PushError::PublishTransport(e.to_string()))?;

        if !status.is_success() {
            return Err(PushError::PublishTransport(format!(
                "gateway returned {status}: {body}"
            )));
        }

        debug!(body = %body, "push publish result");
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }
}
