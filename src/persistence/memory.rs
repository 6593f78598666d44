//! In-memory persistence used when `PERSISTENCE_ENABLED=false` and in tests.

use chrono::Utc;
use parking_lot::Mutex;

use super::models::{Article, NewArticle};
use crate::domain::CounterSnapshot;
use crate::error::GatewayError;

#[derive(Debug)]
struct MemoryState {
    articles: Vec<Article>,
    next_id: i64,
    conviction: CounterSnapshot,
}

/// Process-local store with the same surface as the PostgreSQL layer.
#[derive(Debug)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                articles: Vec::new(),
                next_id: 1,
                conviction: CounterSnapshot {
                    count: 0,
                    last_hit: None,
                },
            }),
        }
    }

    /// Returns all articles, oldest first.
    #[must_use]
    pub fn list_articles(&self) -> Vec<Article> {
        self.state.lock().articles.clone()
    }

    /// Returns one article by ID.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ArticleNotFound`] if no article has `id`.
    pub fn get_article(&self, id: i64) -> Result<Article, GatewayError> {
        self.state
            .lock()
            .articles
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(GatewayError::ArticleNotFound(id))
    }

    /// Inserts an article, assigning the next ID.
    pub fn insert_article(&self, article: &NewArticle) -> Article {
        let mut state = self.state.lock();
        let stored = Article {
            id: state.next_id,
            title: article.title.clone(),
            content: article.content.clone(),
            language: article.language.clone(),
            author: article.author.clone(),
            conviction_count: 0,
            created_at: Utc::now(),
        };
        state.next_id = state.next_id.saturating_add(1);
        state.articles.push(stored.clone());
        stored
    }

    /// Returns the stored meter.
    #[must_use]
    pub fn load_conviction(&self) -> CounterSnapshot {
        self.state.lock().conviction
    }

    /// Stores `snapshot` unless a higher count is already stored.
    pub fn save_conviction(&self, snapshot: &CounterSnapshot) {
        let mut state = self.state.lock();
        if snapshot.count >= state.conviction.count {
            state.conviction = *snapshot;
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn new_article(title: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            content: "cogito ergo sum".to_string(),
            language: "en".to_string(),
            author: "René".to_string(),
        }
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let a = store.insert_article(&new_article("first"));
        let b = store.insert_article(&new_article("second"));
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.list_articles().len(), 2);
    }

    #[test]
    fn get_missing_article_is_not_found() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.get_article(9),
            Err(GatewayError::ArticleNotFound(9))
        ));
    }

    #[test]
    fn save_conviction_never_goes_backwards() {
        let store = InMemoryStore::new();
        let now = Some(Utc::now());
        store.save_conviction(&CounterSnapshot { count: 5, last_hit: now });
        store.save_conviction(&CounterSnapshot { count: 3, last_hit: now });
        assert_eq!(store.load_conviction().count, 5);
    }
}
