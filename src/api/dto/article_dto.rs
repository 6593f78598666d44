//! Article DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::persistence::{Article, NewArticle};

/// Request body for `POST /articles`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateArticleRequest {
    /// Headline; must not be blank.
    pub title: String,
    /// Body text; must not be blank.
    pub content: String,
    /// Language tag (e.g. `"ja"`).
    #[serde(default)]
    pub language: String,
    /// Author name.
    #[serde(default)]
    pub author: String,
}

impl From<CreateArticleRequest> for NewArticle {
    fn from(req: CreateArticleRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            language: req.language,
            author: req.author,
        }
    }
}

/// Response body for `GET /articles`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleListResponse {
    /// All stored articles, oldest first.
    pub articles: Vec<Article>,
}
