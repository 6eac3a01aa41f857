//! Notification input types.

use serde::{Deserialize, Serialize};

/// Parameters describing one logical notification.
///
/// Immutable per-call input; the payload builders in [`crate::payload`]
/// shape these into platform wire formats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationParams {
    /// Title shown on the device.
    pub subject: String,
    /// Body text.
    pub alert: String,
    /// Badge count (iOS).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
    /// Sound to play.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// Media attachment URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Icon name or URL (Android).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Link to open on tap; absent means "open the app".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl NotificationParams {
    /// Create notification params with a subject and alert text.
    pub fn new(subject: impl Into<String>, alert: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            alert: alert.into(),
            ..Default::default()
        }
    }

    /// Set the badge count.
    pub fn badge(mut self, count: u32) -> Self {
        self.badge = Some(count);
        self
    }

    /// Set the sound.
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Set the media attachment URL.
    pub fn poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    /// Set the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the tap-through link.
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Per-call dispatch input: the notification plus an optional access
/// token that overrides the configured one for this call only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushData {
    /// The notification to deliver.
    pub data: NotificationParams,
    /// Caller-supplied access token; bypasses the token exchange.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl PushData {
    /// Wrap notification params with no token override.
    pub fn new(data: NotificationParams) -> Self {
        Self {
            data,
            access_token: None,
        }
    }

    /// Set a per-call access token override.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}
