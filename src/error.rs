//! Push dispatch error types.

use thiserror::Error;

/// Result type for push operations.
pub type Result<T> = std::result::Result<T, PushError>;

/// Push dispatch errors.
#[derive(Debug, Error)]
pub enum PushError {
    /// Configuration is incomplete or names an unsupported platform.
    #[error("Push misconfigured: {0}")]
    Misconfigured(String),

    /// Token exchange request failed at the transport level.
    #[error("Token exchange failed: {0}")]
    AuthTransport(#[source] reqwest::Error),

    /// Token endpoint returned a body that is not valid JSON.
    #[error("Token response not parseable: {0}")]
    AuthResponseParse(String),

    /// Token exchange succeeded but no `access_token` was returned.
    #[error("access token was not returned")]
    MissingAccessToken,

    /// Gateway send failed (network, timeout, or non-2xx response).
    #[error("Gateway publish failed: {0}")]
    PublishTransport(String),
}

impl PushError {
    /// Whether this error is fatal to the adapter as a whole.
    ///
    /// Only configuration errors are; everything else is isolated to a
    /// single platform's pipeline.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Misconfigured(_))
    }
}

impl From<reqwest::Error> for PushError {
    fn from(err: reqwest::Error) -> Self {
        Self::PublishTransport(err.to_string())
    }
}
