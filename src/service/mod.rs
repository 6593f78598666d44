//! Service layer: business logic orchestration.
//!
//! [`ConvictionService`] drives the shared counter and its broadcast;
//! [`ArticleService`] stores articles and triggers background analysis.

pub mod article_service;
pub mod conviction_service;

pub use article_service::ArticleService;
pub use conviction_service::ConvictionService;
