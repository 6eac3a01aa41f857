//! Platform wire payload builders.
//!
//! Pure shaping of [`NotificationParams`] into the APNS and GCM
//! structures the gateway relays, plus the per-platform wrapper the
//! gateway expects at the top level.

use serde::Serialize;

use crate::{NotificationParams, Platform};

/// Tap action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    /// Open a URL.
    #[serde(rename = "url")]
    Url,
    /// Open the app with no target.
    #[serde(rename = "openApp")]
    OpenApp,
}

/// The action attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationAction {
    /// Action kind.
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Button label.
    pub name: String,
    /// Target URL, or empty for [`ActionKind::OpenApp`].
    pub value: String,
}

impl NotificationAction {
    /// Derive the action from notification params.
    ///
    /// A `link` yields a `url` action targeting it; otherwise the action
    /// opens the app with an empty value.
    pub fn from_params(params: &NotificationParams) -> Self {
        match &params.link {
            Some(link) => Self {
                kind: ActionKind::Url,
                name: "Open".to_string(),
                value: link.clone(),
            },
            None => Self {
                kind: ActionKind::OpenApp,
                name: "Open".to_string(),
                value: String::new(),
            },
        }
    }
}

/// APNS payload relayed by the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct ApnsPayload {
    aps: Aps,
    #[serde(rename = "notification-action")]
    notification_action: NotificationAction,
    #[serde(rename = "category-actions")]
    category_actions: Vec<NotificationAction>,
    #[serde(rename = "media-attachment", skip_serializing_if = "Option::is_none")]
    media_attachment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct Aps {
    alert: ApsAlert,
    #[serde(skip_serializing_if = "Option::is_none")]
    badge: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<String>,
    #[serde(rename = "mutable-content")]
    mutable_content: u8,
}

#[derive(Debug, Clone, Serialize)]
struct ApsAlert {
    title: String,
    body: String,
}

impl ApnsPayload {
    /// Build the APNS payload for `params`.
    pub fn build(params: &NotificationParams) -> Self {
        let action = NotificationAction::from_params(params);
        Self {
            aps: Aps {
                alert: ApsAlert {
                    title: params.subject.clone(),
                    body: params.alert.clone(),
                },
                badge: params.badge,
                sound: params.sound.clone(),
                mutable_content: 1,
            },
            notification_action: action.clone(),
            category_actions: vec![action],
            media_attachment: params.poster.clone(),
        }
    }
}

/// GCM payload relayed by the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct GcmPayload {
    alert: GcmAlert,
}

#[derive(Debug, Clone, Serialize)]
struct GcmAlert {
    subject: String,
    message: String,
    #[serde(rename = "notification-action")]
    notification_action: NotificationAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    expandable: Expandable,
}

#[derive(Debug, Clone, Serialize)]
struct Expandable {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(rename = "expandable-actions")]
    expandable_actions: Vec<NotificationAction>,
}

impl GcmPayload {
    /// Build the GCM payload for `params`.
    pub fn build(params: &NotificationParams) -> Self {
        let action = NotificationAction::from_params(params);
        Self {
            alert: GcmAlert {
                subject: params.subject.clone(),
                message: params.alert.clone(),
                notification_action: action.clone(),
                icon: params.icon.clone(),
                expandable: Expandable {
                    kind: "image",
                    value: params.poster.clone(),
                    expandable_actions: vec![action],
                },
            },
        }
    }
}

/// Platform payload under the gateway's top-level platform key.
#[derive(Debug, Clone, Serialize)]
pub enum PlatformPayload {
    /// iOS payload, serialized as `{"apns": …}`.
    #[serde(rename = "apns")]
    Apns(ApnsPayload),
    /// Android payload, serialized as `{"gcm": …}`.
    #[serde(rename = "gcm")]
    Gcm(GcmPayload),
}

impl PlatformPayload {
    /// Build the payload for the given platform.
    pub fn build(platform: Platform, params: &NotificationParams) -> Self {
        match platform {
            Platform::Ios => Self::Apns(ApnsPayload::build(params)),
            Platform::Android => Self::Gcm(GcmPayload::build(params)),
        }
    }
}
