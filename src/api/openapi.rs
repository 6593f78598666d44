//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{
    AnalyzeRequest, ArticleListResponse, ChatRequest, ConvictionIncrementResponse,
    CreateArticleRequest, SimulationResponse,
};
use crate::api::handlers::{ai, articles, conviction, philosophy, sns, system};
use crate::error::{ErrorBody, ErrorResponse};
use crate::persistence::{Article, ConvictionMeter};

/// Generated OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Philosophy Gateway API"),
    paths(
        // System
        system::health_handler,
        // Articles
        articles::list_articles,
        articles::get_article,
        articles::create_article,
        // Conviction
        conviction::increment_conviction,
        conviction::get_conviction,
        // Philosophy
        philosophy::simulate,
        // AI
        ai::chat,
        ai::analyze,
        ai::personalities,
        ai::wisdom,
        // SNS
        sns::feed,
        sns::create_post,
        sns::trending,
    ),
    components(schemas(
        Article,
        ConvictionMeter,
        CreateArticleRequest,
        ArticleListResponse,
        ConvictionIncrementResponse,
        SimulationResponse,
        ChatRequest,
        AnalyzeRequest,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
        system::ServiceUrls,
    )),
    tags(
        (name = "System", description = "Health"),
        (name = "Articles", description = "Philosophy articles"),
        (name = "Conviction", description = "Site-wide conviction meter"),
        (name = "Philosophy", description = "Parallel thought simulation"),
        (name = "AI", description = "AI character service proxy"),
        (name = "SNS", description = "Internal SNS proxy"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health",
            "/api/v1/articles",
            "/api/v1/articles/{id}",
            "/api/v1/conviction",
            "/api/v1/philosophy/simulate",
            "/api/v1/ai/chat",
            "/api/v1/ai/wisdom",
            "/api/v1/sns/posts",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }
}
