//! Push dispatch across platforms.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::client::{Gateway, ImcClient};
use crate::installation::{classify, Device, Installation, Platform, PlatformField};
use crate::payload::PlatformPayload;
use crate::{GatewayEnvelope, ImcConfig, PushData, PushError, Result};

/// Settled result of one platform's pipeline.
#[derive(Debug)]
pub enum DeliveryResult {
    /// The gateway accepted the send; carries its raw response body.
    Delivered(serde_json::Value),
    /// Nothing to send for this platform; no network call was made.
    Skipped,
    /// The pipeline failed; other platforms were unaffected.
    Failed(PushError),
}

impl DeliveryResult {
    /// Whether the gateway accepted this platform's send.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// One platform's settled outcome within a dispatch call.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// The platform this pipeline ran for.
    pub platform: Platform,
    /// What happened.
    pub result: DeliveryResult,
}

/// Multi-platform push adapter for the IMC gateway.
///
/// Classifies installations into per-platform buckets and runs one
/// build → auth → publish pipeline per non-empty bucket, concurrently.
/// Pipelines are isolated: a failing platform is reported in its own
/// outcome and never aborts the others.
pub struct ImcPushAdapter {
    config: ImcConfig,
    platform_fields: Vec<PlatformField>,
    gateway: Arc<dyn Gateway>,
}

impl ImcPushAdapter {
    /// Create an adapter backed by an HTTP gateway client.
    ///
    /// Fails with [`PushError::Misconfigured`] when credentials are
    /// missing or an endpoint URL is invalid.
    pub fn new(config: ImcConfig) -> Result<Self> {
        let gateway = Arc::new(ImcClient::new(config.clone())?);
        Ok(Self {
            config,
            platform_fields: PlatformField::DEFAULT_PRIORITY.to_vec(),
            gateway,
        })
    }

    /// Create an adapter with a custom gateway implementation.
    pub fn with_gateway(config: ImcConfig, gateway: Arc<dyn Gateway>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            platform_fields: PlatformField::DEFAULT_PRIORITY.to_vec(),
            gateway,
        })
    }

    /// Override which installation fields carry the platform, in
    /// priority order.
    pub fn platform_fields(mut self, fields: impl Into<Vec<PlatformField>>) -> Self {
        self.platform_fields = fields.into();
        self
    }

    /// Platforms enabled by the configuration, in iteration order.
    pub fn available_platforms(&self) -> Vec<Platform> {
        self.config.platforms()
    }

    /// Dispatch a notification to every installation's platform.
    ///
    /// Classification runs once; each enabled platform with at least one
    /// valid device gets its own pipeline, all running concurrently.
    /// Returns after every pipeline has settled, one outcome per
    /// non-empty platform in configuration order. Never fails as a
    /// whole: per-platform errors are logged and carried in the
    /// corresponding outcome.
    pub async fn send(
        &self,
        data: &PushData,
        installations: &[Installation],
    ) -> Vec<DispatchOutcome> {
        let bucket = classify(installations, &self.config.platforms(), &self.platform_fields);

        let pipelines = bucket
            .iter()
            .filter(|(_, devices)| !devices.is_empty())
            .map(|(platform, devices)| async move {
                let result = match self.dispatch_platform(platform, data, devices).await {
                    Ok(result) => result,
                    Err(err) => {
                        warn!(platform = %platform, error = %err, "failed to send to gateway");
                        DeliveryResult::Failed(err)
                    }
                };
                DispatchOutcome { platform, result }
            });

        join_all(pipelines).await
    }

    /// One platform's pipeline: payload, token, envelope, publish.
    async fn dispatch_platform(
        &self,
        platform: Platform,
        data: &PushData,
        devices: &[Device],
    ) -> Result<DeliveryResult> {
        let platform_config = self.config.platform_config(platform).ok_or_else(|| {
            PushError::Misconfigured(format!("no push config for {platform}"))
        })?;

        let payload = PlatformPayload::build(platform, &data.data);

        // A per-call token takes precedence over the configured one.
        let supplied_token = data
            .access_token
            .as_deref()
            .or(platform_config.access_token.as_deref());

        let token_response = self.gateway.auth(supplied_token).await?;
        let access_token = token_response.access_token.ok_or_else(|| {
            error!(platform = %platform, "access token was not returned");
            PushError::MissingAccessToken
        })?;

        let Some(envelope) = GatewayEnvelope::for_devices(
            &platform_config.app_key,
            payload,
            devices,
            &self.config.campaign_name,
        ) else {
            debug!(platform = %platform, "skip to send push");
            return Ok(DeliveryResult::Skipped);
        };

        debug!(
            platform = %platform,
            contacts = envelope.contact_count(),
            "publishing gateway push"
        );
        let body = self.gateway.publish(&envelope, &access_token).await?;
        Ok(DeliveryResult::Delivered(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NotificationParams, PlatformConfig, TokenResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockGateway {
        auth_calls: AtomicUsize,
        publish_calls: AtomicUsize,
        supplied_tokens: Mutex<Vec<Option<String>>>,
        withhold_token: bool,
        fail_app_keys: Vec<String>,
    }

    impl MockGateway {
        fn fail_for(app_key: &str) -> Self {
            Self {
                fail_app_keys: vec![app_key.to_string()],
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl Gateway for MockGateway {
        async fn auth(&self, supplied_token: Option<&str>) -> crate::Result<TokenResponse> {
            self.auth_calls.fetch_add(1, Ordering::SeqCst);
            self.supplied_tokens
                .lock()
                .unwrap()
                .push(supplied_token.map(String::from));
            if self.withhold_token {
                return Ok(TokenResponse::default());
            }
            Ok(match supplied_token {
                Some(token) => TokenResponse::supplied(token),
                None => TokenResponse::supplied("exchanged"),
            })
        }

        async fn publish(
            &self,
            envelope: &GatewayEnvelope,
            _access_token: &str,
        ) -> crate::Result<serde_json::Value> {
            self.publish_calls.fetch_add(1, Ordering::SeqCst);
            let value = serde_json::to_value(envelope).unwrap();
            let app_key = value["channelQualifiers"][0].as_str().unwrap().to_string();
            if self.fail_app_keys.contains(&app_key) {
                return Err(PushError::PublishTransport("connection reset".into()));
            }
            Ok(serde_json::json!({"accepted": app_key}))
        }
    }

    fn config() -> ImcConfig {
        ImcConfig::new(
            "cid",
            "secret",
            "rtok",
            "https://oauth.example.com/token",
            "https://gateway.example.com/sends",
            "camp",
        )
        .platform(Platform::Ios, PlatformConfig::new("ios-app"))
        .platform(Platform::Android, PlatformConfig::new("and-app"))
    }

    fn adapter(gateway: MockGateway) -> (ImcPushAdapter, Arc<MockGateway>) {
        let gateway = Arc::new(gateway);
        let adapter = ImcPushAdapter::with_gateway(config(), gateway.clone()).unwrap();
        (adapter, gateway)
    }

    fn both_platform_installations() -> Vec<Installation> {
        vec![
            Installation::new("ios", "c1", "u1"),
            Installation::new("android", "c2", "u2"),
        ]
    }

    #[tokio::test]
    async fn test_send_settles_with_partial_failure() {
        let (adapter, gateway) = adapter(MockGateway::fail_for("ios-app"));
        let data = PushData::new(NotificationParams::new("S", "A"));

        let outcomes = adapter.send(&data, &both_platform_installations()).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].platform, Platform::Ios);
        assert!(matches!(
            outcomes[0].result,
            DeliveryResult::Failed(PushError::PublishTransport(_))
        ));
        assert_eq!(outcomes[1].platform, Platform::Android);
        assert!(outcomes[1].result.is_delivered());
        assert_eq!(gateway.publish_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_send_skips_empty_buckets() {
        let (adapter, gateway) = adapter(MockGateway::default());
        let data = PushData::new(NotificationParams::new("S", "A"));
        let installations = vec![Installation::new("android", "c2", "u2")];

        let outcomes = adapter.send(&data, &installations).await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].platform, Platform::Android);
        assert_eq!(gateway.auth_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_send_with_no_valid_installations_is_empty() {
        let (adapter, gateway) = adapter(MockGateway::default());
        let data = PushData::new(NotificationParams::new("S", "A"));
        let installations = vec![Installation {
            push_type: Some("ios".into()),
            channel_id: Some("c3".into()),
            ..Default::default()
        }];

        let outcomes = adapter.send(&data, &installations).await;

        assert!(outcomes.is_empty());
        assert_eq!(gateway.auth_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_per_call_token_overrides_configured() {
        let config = config().platform(
            Platform::Android,
            PlatformConfig::new("and-app").access_token("configured"),
        );
        let gateway = Arc::new(MockGateway::default());
        let adapter = ImcPushAdapter::with_gateway(config, gateway.clone()).unwrap();
        let data = PushData::new(NotificationParams::new("S", "A")).access_token("per-call");
        let installations = vec![Installation::new("android", "c2", "u2")];

        adapter.send(&data, &installations).await;

        let supplied = gateway.supplied_tokens.lock().unwrap();
        assert_eq!(supplied.as_slice(), &[Some("per-call".to_string())]);
    }

    #[tokio::test]
    async fn test_configured_token_used_without_override() {
        let config = config().platform(
            Platform::Ios,
            PlatformConfig::new("ios-app").access_token("configured"),
        );
        let gateway = Arc::new(MockGateway::default());
        let adapter = ImcPushAdapter::with_gateway(config, gateway.clone()).unwrap();
        let data = PushData::new(NotificationParams::new("S", "A"));
        let installations = vec![Installation::new("ios", "c1", "u1")];

        adapter.send(&data, &installations).await;

        let supplied = gateway.supplied_tokens.lock().unwrap();
        assert_eq!(supplied.as_slice(), &[Some("configured".to_string())]);
    }

    #[tokio::test]
    async fn test_missing_access_token_aborts_only_that_pipeline() {
        let gateway = MockGateway {
            withhold_token: true,
            ..Default::default()
        };
        let (adapter, gateway) = adapter(gateway);
        let data = PushData::new(NotificationParams::new("S", "A"));

        let outcomes = adapter.send(&data, &both_platform_installations()).await;

        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert!(matches!(
                outcome.result,
                DeliveryResult::Failed(PushError::MissingAccessToken)
            ));
        }
        assert_eq!(gateway.publish_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_duplicate_installations_collapse_to_one_contact() {
        let (adapter, gateway) = adapter(MockGateway::default());
        let data = PushData::new(NotificationParams::new("S", "A"));
        let installations = vec![
            Installation::new("ios", "c1", "u1"),
            Installation::new("ios", "c1", "u1"),
        ];

        let outcomes = adapter.send(&data, &installations).await;

        assert!(outcomes[0].result.is_delivered());
        assert_eq!(gateway.publish_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_available_platforms() {
        let adapter = ImcPushAdapter::with_gateway(config(), Arc::new(MockGateway::default()))
            .unwrap();
        assert_eq!(
            adapter.available_platforms(),
            vec![Platform::Ios, Platform::Android]
        );
    }

    #[test]
    fn test_new_fails_fast_on_misconfiguration() {
        let mut bad = config();
        bad.client_id = String::new();
        assert!(matches!(
            ImcPushAdapter::new(bad),
            Err(PushError::Misconfigured(_))
        ));
    }
}
