//! # IMC Push
//!
//! Multi-platform push notification dispatch through the IMC channel
//! gateway.
//!
//! ## Features
//!
//! - **Classification**: partitions device installations into
//!   per-platform buckets, dropping invalid records
//! - **Payload shaping**: pure builders for the APNS and GCM wire
//!   formats the gateway relays
//! - **Token exchange**: refresh-token grant against the gateway's
//!   OAuth endpoint, or passthrough of a pre-issued token
//! - **Isolated fan-out**: one concurrent pipeline per platform; a
//!   failing platform never blocks the others
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use imc_push::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ImcConfig::new(
//!         "client-id",
//!         "client-secret",
//!         "refresh-token",
//!         "https://oauth.example.com/token",
//!         "https://gateway.example.com/channels/sends",
//!         "spring-campaign",
//!     )
//!     .platform(Platform::Ios, PlatformConfig::new("ios-app-key"))
//!     .platform(Platform::Android, PlatformConfig::new("android-app-key"));
//!
//!     let adapter = ImcPushAdapter::new(config)?;
//!
//!     let data = PushData::new(
//!         NotificationParams::new("Sale", "50% off today").link("https://example.com/sale"),
//!     );
//!     let installations = vec![Installation::new("ios", "channel-1", "user-1")];
//!
//!     for outcome in adapter.send(&data, &installations).await {
//!         println!("{}: {:?}", outcome.platform, outcome.result);
//!     }
//!     Ok(())
//! }
//! ```

mod adapter;
mod client;
mod config;
mod error;
mod gateway;
mod installation;
mod notification;
mod payload;

pub use adapter::{DeliveryResult, DispatchOutcome, ImcPushAdapter};
pub use client::{Gateway, ImcClient};
pub use config::{ImcConfig, PlatformConfig};
pub use error::{PushError, Result};
pub use gateway::{GatewayContact, GatewayEnvelope, TokenResponse};
pub use installation::{
    classify, Device, DeviceBucket, Installation, Platform, PlatformField,
};
pub use notification::{NotificationParams, PushData};
pub use payload::{ActionKind, ApnsPayload, GcmPayload, NotificationAction, PlatformPayload};

/// Prelude for common imports.
///
/// ```
/// use imc_push::prelude::*;
/// ```
pub mod prelude {
    pub use crate::adapter::{DeliveryResult, DispatchOutcome, ImcPushAdapter};
    pub use crate::client::{Gateway, ImcClient};
    pub use crate::config::{ImcConfig, PlatformConfig};
    pub use crate::error::{PushError, Result};
    pub use crate::installation::{Installation, Platform, PlatformField};
    pub use crate::notification::{NotificationParams, PushData};
}
