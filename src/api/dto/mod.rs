//! Data Transfer Objects for REST request/response serialization.
//!
//! Proxied AI and SNS payloads are passed through as `serde_json::Value`
//! and have no DTO of their own.

pub mod ai_dto;
pub mod article_dto;
pub mod conviction_dto;
pub mod simulation_dto;

pub use ai_dto::*;
pub use article_dto::*;
pub use conviction_dto::*;
pub use simulation_dto::*;
