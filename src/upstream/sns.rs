//! Client for the internal SNS service.

use std::time::Duration;

use serde_json::{Map, Value};

use super::client::UpstreamClient;
use crate::error::GatewayError;

/// Typed wrapper over the SNS service endpoints.
#[derive(Debug, Clone)]
pub struct SnsClient {
    inner: UpstreamClient,
}

impl SnsClient {
    /// Creates a client for the SNS service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        Ok(Self {
            inner: UpstreamClient::new("SNS", base_url, timeout)?,
        })
    }

    /// Base URL of the service.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    /// Fetches the post feed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamUnavailable`] if the call fails.
    pub async fn feed(&self) -> Result<Value, GatewayError> {
        self.inner.get_json("/feed", &[]).await
    }

    /// Creates a post from an arbitrary JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamUnavailable`] if the call fails.
    pub async fn create_post(&self, post: &Map<String, Value>) -> Result<Value, GatewayError> {
        self.inner.post_json("/posts", post).await
    }

    /// Fetches trending topics.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamUnavailable`] if the call fails.
    pub async fn trending(&self) -> Result<Value, GatewayError> {
        self.inner.get_json("/trending", &[]).await
    }
}
