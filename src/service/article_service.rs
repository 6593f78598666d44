//! Article service: storage plus best-effort AI analysis.

use tokio::task::JoinHandle;

use crate::error::GatewayError;
use crate::persistence::{Article, NewArticle, Store};
use crate::upstream::{AiClient, AnalyzeRequest};

/// Stores articles and kicks off a detached AI analysis for each new one.
#[derive(Debug, Clone)]
pub struct ArticleService {
    store: Store,
    ai: AiClient,
}

impl ArticleService {
    /// Creates a new `ArticleService`.
    #[must_use]
    pub fn new(store: Store, ai: AiClient) -> Self {
        Self { store, ai }
    }

    /// Returns every stored article.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on storage failure.
    pub async fn list(&self) -> Result<Vec<Article>, GatewayError> {
        self.store.list_articles().await
    }

    /// Returns one article.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ArticleNotFound`] or a persistence error.
    pub async fn get(&self, id: i64) -> Result<Article, GatewayError> {
        self.store.get_article(id).await
    }

    /// Validates and stores `article`, then starts its analysis in the
    /// background. The returned article does not wait on the analysis.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the title or content is
    /// blank, or a persistence error if the insert fails.
    pub async fn create(&self, article: NewArticle) -> Result<Article, GatewayError> {
        if article.title.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("title must not be empty".to_string()));
        }
        if article.content.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("content must not be empty".to_string()));
        }

        let stored = self.store.insert_article(&article).await?;
        tracing::info!(article_id = stored.id, "article created");

        drop(self.analyze_in_background(&stored));
        Ok(stored)
    }

    /// Spawns the AI analysis of `article` as a detached task.
    ///
    /// The task is bounded by the AI client's request timeout. Its outcome
    /// is only logged: success at `info`, failure at `warn`, then dropped.
    pub fn analyze_in_background(&self, article: &Article) -> JoinHandle<()> {
        let ai = self.ai.clone();
        let article_id = article.id;
        let request = AnalyzeRequest {
            text: article.content.clone(),
        };

        tokio::spawn(async move {
            match ai.analyze(&request).await {
                Ok(analysis) => {
                    tracing::info!(article_id, %analysis, "article analysis complete");
                }
                Err(err) => {
                    tracing::warn!(article_id, error = %err, "article analysis failed, dropping");
                }
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn make_service() -> ArticleService {
        // Nothing listens on port 9; analysis fails fast and is dropped.
        let Ok(ai) = AiClient::new("http://127.0.0.1:9", Duration::from_millis(200)) else {
            panic!("client build failed");
        };
        ArticleService::new(Store::in_memory(), ai)
    }

    fn new_article(title: &str, content: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            content: content.to_string(),
            language: "en".to_string(),
            author: "Simone".to_string(),
        }
    }

    #[tokio::test]
    async fn create_stores_and_lists() {
        let service = make_service();
        let Ok(article) = service.create(new_article("Being", "and Time")).await else {
            panic!("create failed");
        };
        assert_eq!(article.id, 1);
        assert_eq!(article.conviction_count, 0);

        let Ok(all) = service.list().await else {
            panic!("list failed");
        };
        assert_eq!(all, vec![article.clone()]);

        let Ok(fetched) = service.get(article.id).await else {
            panic!("get failed");
        };
        assert_eq!(fetched, article);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let service = make_service();
        assert!(matches!(
            service.create(new_article("  ", "body")).await,
            Err(GatewayError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.create(new_article("title", "")).await,
            Err(GatewayError::InvalidRequest(_))
        ));
        let Ok(all) = service.list().await else {
            panic!("list failed");
        };
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn failed_analysis_is_logged_and_dropped() {
        let service = make_service();
        let created = service.create(new_article("Nausea", "existence precedes essence")).await;
        let Ok(article) = created else {
            panic!("create failed");
        };
        let handle = service.analyze_in_background(&article);
        tokio_test::assert_ok!(handle.await);
    }
}
