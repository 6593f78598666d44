//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{Article, CONVICTION_METER_ID, NewArticle};
use crate::config::GatewayConfig;
use crate::domain::CounterSnapshot;
use crate::error::GatewayError;

type ArticleRow = (i64, String, String, String, String, i64, DateTime<Utc>);

fn article_from_row(
    (id, title, content, language, author, conviction_count, created_at): ArticleRow,
) -> Article {
    Article {
        id,
        title,
        content,
        language,
        author,
        conviction_count,
        created_at,
    }
}

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database cannot
    /// be reached within the configured timeout.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), GatewayError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))
    }

    /// Returns all articles, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list_articles(&self) -> Result<Vec<Article>, GatewayError> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, title, content, language, author, conviction_count, created_at \
             FROM articles ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(article_from_row).collect())
    }

    /// Returns one article by ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ArticleNotFound`] if no row matches, or a
    /// [`GatewayError::PersistenceError`] on database failure.
    pub async fn get_article(&self, id: i64) -> Result<Article, GatewayError> {
        sqlx::query_as::<_, ArticleRow>(
            "SELECT id, title, content, language, author, conviction_count, created_at \
             FROM articles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(article_from_row)
        .ok_or(GatewayError::ArticleNotFound(id))
    }

    /// Inserts an article and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn insert_article(&self, article: &NewArticle) -> Result<Article, GatewayError> {
        let row = sqlx::query_as::<_, ArticleRow>(
            "INSERT INTO articles (title, content, language, author) VALUES ($1, $2, $3, $4) \
             RETURNING id, title, content, language, author, conviction_count, created_at",
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(&article.language)
        .bind(&article.author)
        .fetch_one(&self.pool)
        .await?;

        Ok(article_from_row(row))
    }

    /// Loads the site-wide meter, creating it at zero if missing.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_conviction(&self) -> Result<CounterSnapshot, GatewayError> {
        sqlx::query(
            "INSERT INTO conviction_meters (id, count) VALUES ($1, 0) ON CONFLICT (id) DO NOTHING",
        )
            .bind(CONVICTION_METER_ID)
            .execute(&self.pool)
            .await?;

        let (count, last_hit) = sqlx::query_as::<_, (i64, Option<DateTime<Utc>>)>(
            "SELECT count, last_hit FROM conviction_meters WHERE id = $1",
        )
        .bind(CONVICTION_METER_ID)
        .fetch_one(&self.pool)
        .await?;

        Ok(CounterSnapshot { count, last_hit })
    }

    /// Stores `snapshot` unless a higher count is already stored.
    ///
    /// Concurrent writers may finish out of order; `GREATEST` keeps the
    /// stored count monotonic.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_conviction(&self, snapshot: &CounterSnapshot) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO conviction_meters (id, count, last_hit) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET \
             count = GREATEST(conviction_meters.count, EXCLUDED.count), \
             last_hit = GREATEST(conviction_meters.last_hit, EXCLUDED.last_hit)",
        )
        .bind(CONVICTION_METER_ID)
        .bind(snapshot.count)
        .bind(snapshot.last_hit)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
