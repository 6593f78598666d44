//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::domain::{Broadcaster, ConnectionRegistry, ConvictionCounter, ParallelThoughtSimulator};
use crate::error::GatewayError;
use crate::persistence::Store;
use crate::service::{ArticleService, ConvictionService};
use crate::upstream::{AiClient, SnsClient};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Every field is explicitly constructed once and passed in; there is no
/// process-global state, so several isolated instances can run side by
/// side in tests.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Conviction meter and its broadcast.
    pub conviction: ConvictionService,
    /// Article storage and background analysis.
    pub articles: ArticleService,
    /// Live WebSocket connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Fan-out to `registry`.
    pub broadcaster: Broadcaster,
    /// Parallel thought simulation.
    pub simulator: ParallelThoughtSimulator,
    /// AI character service.
    pub ai: AiClient,
    /// Internal SNS service.
    pub sns: SnsClient,
    /// Frames buffered per connection.
    pub ws_outbox_capacity: usize,
}

impl AppState {
    /// Wires every component from `config` on top of `store` and `counter`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if an upstream HTTP client cannot
    /// be built.
    pub fn build(
        config: &GatewayConfig,
        store: Store,
        counter: ConvictionCounter,
    ) -> Result<Self, GatewayError> {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(
            Arc::clone(&registry),
            config.ws_write_timeout(),
            config.broadcast_max_in_flight,
        );

        let ai = AiClient::new(&config.ai_service_url, config.upstream_timeout())?;
        let sns = SnsClient::new(&config.sns_service_url, config.upstream_timeout())?;

        let conviction =
            ConvictionService::new(Arc::new(counter), broadcaster.clone(), store.clone());
        let articles = ArticleService::new(store, ai.clone());

        Ok(Self {
            conviction,
            articles,
            registry,
            broadcaster,
            simulator: ParallelThoughtSimulator::new(),
            ai,
            sns,
            ws_outbox_capacity: config.ws_outbox_capacity.max(1),
        })
    }
}
