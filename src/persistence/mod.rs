//! Persistence layer: articles and the conviction meter.
//!
//! [`Store`] dispatches to PostgreSQL (`sqlx::PgPool`) in production or to
//! a process-local [`InMemoryStore`] when persistence is disabled.

pub mod memory;
pub mod models;
pub mod postgres;

use std::sync::Arc;

pub use memory::InMemoryStore;
pub use models::{Article, ConvictionMeter, NewArticle};
pub use postgres::PostgresPersistence;

use crate::domain::CounterSnapshot;
use crate::error::GatewayError;

/// Backing store selected at startup.
#[derive(Debug, Clone)]
pub enum Store {
    /// Durable PostgreSQL storage.
    Postgres(PostgresPersistence),
    /// Process-local storage, lost on restart.
    Memory(Arc<InMemoryStore>),
}

impl Store {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::Memory(Arc::new(InMemoryStore::new()))
    }

    /// Short name for logs and the health endpoint.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Returns all articles, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list_articles(&self) -> Result<Vec<Article>, GatewayError> {
        match self {
            Self::Postgres(pg) => pg.list_articles().await,
            Self::Memory(mem) => Ok(mem.list_articles()),
        }
    }

    /// Returns one article by ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ArticleNotFound`] or a persistence error.
    pub async fn get_article(&self, id: i64) -> Result<Article, GatewayError> {
        match self {
            Self::Postgres(pg) => pg.get_article(id).await,
            Self::Memory(mem) => mem.get_article(id),
        }
    }

    /// Inserts an article and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn insert_article(&self, article: &NewArticle) -> Result<Article, GatewayError> {
        match self {
            Self::Postgres(pg) => pg.insert_article(article).await,
            Self::Memory(mem) => Ok(mem.insert_article(article)),
        }
    }

    /// Loads the stored conviction meter.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_conviction(&self) -> Result<CounterSnapshot, GatewayError> {
        match self {
            Self::Postgres(pg) => pg.load_conviction().await,
            Self::Memory(mem) => Ok(mem.load_conviction()),
        }
    }

    /// Writes a counter snapshot back to storage.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_conviction(&self, snapshot: &CounterSnapshot) -> Result<(), GatewayError> {
        match self {
            Self::Postgres(pg) => pg.save_conviction(snapshot).await,
            Self::Memory(mem) => {
                mem.save_conviction(snapshot);
                Ok(())
            }
        }
    }
}
