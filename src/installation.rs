//! Device installation records and platform classification.

use serde::{Deserialize, Serialize};

/// Push platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// iOS device (APNS via the gateway).
    Ios,
    /// Android device (GCM via the gateway).
    Android,
}

impl Platform {
    /// All platforms the gateway supports.
    pub const SUPPORTED: [Platform; 2] = [Platform::Ios, Platform::Android];

    /// Parse a platform identifier as it appears in installation records.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ios" => Some(Self::Ios),
            "android" => Some(Self::Android),
            _ => None,
        }
    }

    /// The identifier used in installation records and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installation fields that may carry the platform identifier.
///
/// Older records use `deviceType`, newer ones `pushType`; classification
/// consults them in a configured priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformField {
    /// The `pushType` field.
    PushType,
    /// The `deviceType` field.
    DeviceType,
}

impl PlatformField {
    /// Default lookup order: `pushType` first, then `deviceType`.
    pub const DEFAULT_PRIORITY: [PlatformField; 2] =
        [PlatformField::PushType, PlatformField::DeviceType];
}

/// A device registration record as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    /// Platform identifier (current field name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_type: Option<String>,
    /// Platform identifier (legacy field name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// Gateway channel the device is registered on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Owning user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Installation {
    /// Create an installation with the current platform field set.
    pub fn new(
        push_type: impl Into<String>,
        channel_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            push_type: Some(push_type.into()),
            device_type: None,
            channel_id: Some(channel_id.into()),
            user_id: Some(user_id.into()),
        }
    }

    fn field(&self, field: PlatformField) -> Option<&str> {
        match field {
            PlatformField::PushType => self.push_type.as_deref(),
            PlatformField::DeviceType => self.device_type.as_deref(),
        }
    }

    /// Resolve the platform by consulting `fields` in priority order.
    ///
    /// A field whose value does not name a platform in `enabled` is
    /// skipped, so a stale `pushType` can still fall through to a valid
    /// `deviceType`.
    pub fn resolve_platform(
        &self,
        fields: &[PlatformField],
        enabled: &[Platform],
    ) -> Option<Platform> {
        fields
            .iter()
            .filter_map(|&f| self.field(f))
            .filter_map(Platform::parse)
            .find(|p| enabled.contains(p))
    }
}

/// A classified device: the (channel, user) pair the gateway addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Gateway channel id.
    pub channel_id: String,
    /// Owning user id.
    pub user_id: String,
}

impl Device {
    /// Create a device reference.
    pub fn new(channel_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            user_id: user_id.into(),
        }
    }
}

/// Per-platform device lists produced by classification.
///
/// Holds one entry per enabled platform, in configuration order, even
/// when no installation matched — callers can tell "no devices" apart
/// from "platform disabled".
#[derive(Debug, Clone, Default)]
pub struct DeviceBucket {
    entries: Vec<(Platform, Vec<Device>)>,
}

impl DeviceBucket {
    /// Create a bucket with an empty device list per enabled platform.
    pub fn new(platforms: &[Platform]) -> Self {
        Self {
            entries: platforms.iter().map(|&p| (p, Vec::new())).collect(),
        }
    }

    /// The devices classified under `platform`, if it is enabled.
    pub fn devices(&self, platform: Platform) -> Option<&[Device]> {
        self.entries
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, d)| d.as_slice())
    }

    fn push(&mut self, platform: Platform, device: Device) {
        if let Some((_, devices)) = self.entries.iter_mut().find(|(p, _)| *p == platform) {
            devices.push(device);
        }
    }

    /// Iterate entries in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &[Device])> {
        self.entries.iter().map(|(p, d)| (*p, d.as_slice()))
    }
}

/// Partition installations into per-platform device lists.
///
/// Records missing `channelId` or `userId` are dropped silently, as are
/// records whose platform is not in `platforms`. Order within a platform
/// follows input order.
pub fn classify(
    installations: &[Installation],
    platforms: &[Platform],
    fields: &[PlatformField],
) -> DeviceBucket {
    let mut bucket = DeviceBucket::new(platforms);

    for installation in installations {
        let (Some(channel_id), Some(user_id)) =
            (&installation.channel_id, &installation.user_id)
        else {
            continue;
        };
        if let Some(platform) = installation.resolve_platform(fields, platforms) {
            bucket.push(platform, Device::new(channel_id.as_str(), user_id.as_str()));
        }
    }

    bucket
}
