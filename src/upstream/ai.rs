//! Client for the AI character service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::client::UpstreamClient;
use crate::error::GatewayError;

/// Body of `POST /chat` on the AI service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Character to talk to (e.g. `"socrates"`).
    pub character: String,
    /// The user's message.
    pub message: String,
    /// Optional conversation context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Body of `POST /analyze` on the AI service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Text to analyze.
    pub text: String,
}

/// Typed wrapper over the AI service endpoints.
#[derive(Debug, Clone)]
pub struct AiClient {
    inner: UpstreamClient,
}

impl AiClient {
    /// Creates a client for the AI service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        Ok(Self {
            inner: UpstreamClient::new("AI", base_url, timeout)?,
        })
    }

    /// Base URL of the service.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    /// Talks to a philosopher character.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamUnavailable`] if the call fails.
    pub async fn chat(&self, request: &ChatRequest) -> Result<Value, GatewayError> {
        self.inner.post_json("/chat", request).await
    }

    /// Runs a philosophy analysis over `text`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamUnavailable`] if the call fails.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<Value, GatewayError> {
        self.inner.post_json("/analyze", request).await
    }

    /// Lists the available character personalities.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamUnavailable`] if the call fails.
    pub async fn personalities(&self) -> Result<Value, GatewayError> {
        self.inner.get_json("/personalities", &[]).await
    }

    /// Generates a piece of wisdom on `theme`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamUnavailable`] if the call fails.
    pub async fn wisdom(&self, theme: &str) -> Result<Value, GatewayError> {
        self.inner.get_json("/wisdom", &[("theme", theme)]).await
    }
}
