//! Thin JSON-over-HTTP client for one upstream service.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::error::GatewayError;

/// JSON client bound to one upstream base URL.
///
/// Every request carries the configured timeout. There is no retry: a
/// failed call surfaces as [`GatewayError::UpstreamUnavailable`].
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    service: &'static str,
    base_url: String,
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Creates a client for `service` rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the HTTP client cannot be built.
    pub fn new(
        service: &'static str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("building {service} client: {e}")))?;
        Ok(Self {
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}{path}?{query}` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamUnavailable`] on connection failure,
    /// timeout, non-2xx status, or an undecodable body, and
    /// [`GatewayError::InvalidRequest`] if the URL cannot be built.
    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, GatewayError> {
        let url = reqwest::Url::parse_with_params(&self.url(path), query).map_err(|e| {
            GatewayError::InvalidRequest(format!("bad {} URL for {path}: {e}", self.service))
        })?;
        self.execute(path, self.http.get(url)).await
    }

    /// `POST {base}{path}` with a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UpstreamUnavailable`] on connection failure,
    /// timeout, non-2xx status, or an undecodable body.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<Value, GatewayError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.http.post(self.url(path)).json(body);
        self.execute(path, request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn execute(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, GatewayError> {
        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| self.unavailable(path, &e))?;
        response.json::<Value>().await.map_err(|e| self.unavailable(path, &e))
    }

    fn unavailable(&self, path: &str, err: &reqwest::Error) -> GatewayError {
        tracing::warn!(service = self.service, path, error = %err, "upstream call failed");
        GatewayError::UpstreamUnavailable {
            service: self.service,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::net::SocketAddr;

    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    use super::*;

    async fn spawn_upstream() -> SocketAddr {
        let app = Router::new()
            .route(
                "/wisdom",
                get(|Query(q): Query<std::collections::HashMap<String, String>>| async move {
                    Json(serde_json::json!({ "theme": q.get("theme") }))
                }),
            )
            .route("/feed", get(|| async { Json(serde_json::json!([{"id": 1}, {"id": 2}])) }))
            .route("/echo", post(|Json(body): Json<Value>| async move { Json(body) }))
            .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        addr
    }

    fn client(addr: SocketAddr) -> UpstreamClient {
        let base_url = format!("http://{addr}/");
        let Ok(client) = UpstreamClient::new("AI", &base_url, Duration::from_secs(2)) else {
            panic!("client build failed");
        };
        client
    }

    #[tokio::test]
    async fn get_passes_query_through() {
        let addr = spawn_upstream().await;
        let Ok(value) = client(addr).get_json("/wisdom", &[("theme", "death")]).await else {
            panic!("request failed");
        };
        assert_eq!(value["theme"], "death");
    }

    #[tokio::test]
    async fn arrays_are_passed_through() {
        let addr = spawn_upstream().await;
        let Ok(value) = client(addr).get_json("/feed", &[]).await else {
            panic!("request failed");
        };
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn post_round_trips_body() {
        let addr = spawn_upstream().await;
        let body = serde_json::json!({"text": "to be is to be perceived"});
        let Ok(value) = client(addr).post_json("/echo", &body).await else {
            panic!("request failed");
        };
        assert_eq!(value, body);
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let addr = spawn_upstream().await;
        let result = client(addr).get_json("/broken", &[]).await;
        assert!(matches!(
            result,
            Err(GatewayError::UpstreamUnavailable { service: "AI", .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        // Bind then drop to get a port nobody listens on.
        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        drop(listener);

        let result = client(addr).get_json("/anything", &[]).await;
        assert!(matches!(result, Err(GatewayError::UpstreamUnavailable { .. })));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let Ok(client) = UpstreamClient::new("SNS", "http://sns:3002/", Duration::from_secs(1))
        else {
            panic!("client build failed");
        };
        assert_eq!(client.base_url(), "http://sns:3002");
        assert_eq!(client.url("/feed"), "http://sns:3002/feed");
    }
}
