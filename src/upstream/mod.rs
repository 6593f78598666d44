//! Clients for the two proxied services: AI characters and the internal SNS.

pub mod ai;
pub mod client;
pub mod sns;

pub use ai::{AiClient, AnalyzeRequest, ChatRequest};
pub use client::UpstreamClient;
pub use sns::SnsClient;
