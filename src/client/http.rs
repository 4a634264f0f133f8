use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::{AnalyzeResponse, AnalyzeTransport};
use crate::config::ClientConfig;
use crate::envelope::{AnalyzeReply, AnalyzeRequest};
use crate::error::ClientError;

pub const ANALYZE_PATH: &str = "/analyze";

/// reqwest-backed transport for `POST /analyze`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}{}", endpoint.trim_end_matches('/'), ANALYZE_PATH),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let transport = Self::new(&config.endpoint);
        match config.timeout_secs {
            Some(secs) => transport.with_timeout(Duration::from_secs(secs)),
            None => transport,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The configured timeout covers the body too, so both stages map alike
    fn request_error(&self, e: reqwest::Error) -> ClientError {
        match self.timeout {
            Some(timeout) if e.is_timeout() => ClientError::Timeout(timeout),
            _ => ClientError::Http(e),
        }
    }
}

#[async_trait]
impl AnalyzeTransport for HttpTransport {
    async fn post_analyze(&self, payload: &AnalyzeRequest) -> Result<AnalyzeResponse, ClientError> {
        let mut request = self.client.post(&self.url).json(payload);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} responded with status {}", self.url, status);
            return Ok(AnalyzeResponse::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.request_error(e))?;
        debug!("Received {} bytes from {}", body.len(), self.url);
        Ok(AnalyzeResponse::Reply(AnalyzeReply::from_slice(&body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::SlotResult;
    use axum::body::{Body, Bytes};
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    async fn spawn(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn payload() -> AnalyzeRequest {
        AnalyzeRequest {
            text: "hello".into(),
            source_lang: "en".into(),
            target_lang: "hi".into(),
        }
    }

    #[test]
    fn url_joins_endpoint_and_path() {
        assert_eq!(HttpTransport::new("http://host:1/").url(), "http://host:1/analyze");
    }

    #[tokio::test]
    async fn posts_json_payload() {
        let router = Router::new().route(
            "/analyze",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["content-type"], "application/json");
                assert_eq!(
                    body,
                    json!({"text": "hello", "source_lang": "en", "target_lang": "hi"})
                );
                Json(json!({
                    "sentiment": {"sentiment": "NEUTRAL", "score": 0.5},
                    "translation": {"text": "namaste"},
                    "chat": {"error": "down"}
                }))
            }),
        );
        let base = spawn(router).await;

        let response = HttpTransport::new(&base).post_analyze(&payload()).await.unwrap();
        let AnalyzeResponse::Reply(AnalyzeReply::Analysis(envelope)) = response else {
            panic!("expected envelope, got {:?}", response);
        };
        assert_eq!(envelope.chat, SlotResult::Failure("down".into()));
    }

    #[tokio::test]
    async fn error_status_is_reported_without_body() {
        let router = Router::new().route(
            "/analyze",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "not json at all") }),
        );
        let base = spawn(router).await;

        let response = HttpTransport::new(&base).post_analyze(&payload()).await.unwrap();
        assert_eq!(response, AnalyzeResponse::Status(500));
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_error() {
        let router = Router::new().route("/analyze", post(|| async { "<html>" }));
        let base = spawn(router).await;

        let err = HttpTransport::new(&base).post_analyze(&payload()).await.unwrap_err();
        assert!(matches!(err, ClientError::Json(_)));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let router = Router::new().route(
            "/analyze",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"error": "late"}))
            }),
        );
        let base = spawn(router).await;

        let err = HttpTransport::new(&base)
            .with_timeout(Duration::from_millis(100))
            .post_analyze(&payload())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout(_)));
    }

    #[tokio::test]
    async fn stalled_body_times_out() {
        let router = Router::new().route(
            "/analyze",
            post(|| async {
                let stalled = futures::stream::pending::<Result<Bytes, std::io::Error>>();
                (StatusCode::OK, Body::from_stream(stalled))
            }),
        );
        let base = spawn(router).await;

        let err = HttpTransport::new(&base)
            .with_timeout(Duration::from_millis(200))
            .post_analyze(&payload())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout(_)), "got {:?}", err);
    }
}
