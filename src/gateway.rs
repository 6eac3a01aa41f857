//! Gateway envelope types.

use serde::{Deserialize, Serialize};

use crate::installation::Device;
use crate::payload::PlatformPayload;

/// One addressable contact in a gateway send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayContact {
    channel: ContactChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ContactChannel {
    qualifier: String,
    destination: String,
}

impl GatewayContact {
    /// Address a device on the app's channel as `userId|channelId`.
    pub fn new(app_key: &str, device: &Device) -> Self {
        Self {
            channel: ContactChannel {
                qualifier: app_key.to_string(),
                destination: format!("{}|{}", device.user_id, device.channel_id),
            },
        }
    }
}

/// The JSON body posted to the gateway's send endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEnvelope {
    channel_qualifiers: Vec<String>,
    content: EnvelopeContent,
    contacts: Vec<GatewayContact>,
    campaign_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeContent {
    // Always null: the gateway requires the key for inline content.
    content_id: Option<String>,
    simple: PlatformPayload,
}

impl GatewayEnvelope {
    /// Wrap a platform payload and device list for the gateway.
    ///
    /// Returns `None` when `devices` is empty — nothing to send, not an
    /// error. Duplicate (appKey, userId, channelId) devices collapse to
    /// one contact, first occurrence kept.
    pub fn for_devices(
        app_key: &str,
        payload: PlatformPayload,
        devices: &[Device],
        campaign_name: &str,
    ) -> Option<Self> {
        if devices.is_empty() {
            return None;
        }

        let mut contacts: Vec<GatewayContact> = Vec::with_capacity(devices.len());
        for device in devices {
            let contact = GatewayContact::new(app_key, device);
            if !contacts.contains(&contact) {
                contacts.push(contact);
            }
        }

        Some(Self {
            channel_qualifiers: vec![app_key.to_string()],
            content: EnvelopeContent {
                content_id: None,
                simple: payload,
            },
            contacts,
            campaign_name: campaign_name.to_string(),
        })
    }

    /// Number of contacts this envelope addresses.
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }
}

/// Parsed body of the token endpoint's response.
///
/// A successful exchange carries `access_token`; its absence is a
/// logical failure the dispatch layer detects, not a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    /// The bearer token, when the exchange succeeded.
    pub access_token: Option<String>,
}

impl TokenResponse {
    /// Wrap an already-held token as an exchange result.
    pub fn supplied(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
        }
    }
}
