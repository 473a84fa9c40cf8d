use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
use std::fmt::Debug;
use tracing::debug;

use crate::{error::FetchError, model::RequestConfig};

/// Issues one request and hands back the parsed JSON body.
///
/// The controller owns cancellation; implementations only need to be
/// cancel-safe, i.e. fine with their future being dropped mid-flight.
#[async_trait]
pub trait JsonTransport: Send + Sync + Debug {
    async fn fetch_json(
        &self,
        resource: &str,
        config: &RequestConfig,
    ) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }
}

#[async_trait]
impl JsonTransport for HttpTransport {
    async fn fetch_json(
        &self,
        resource: &str,
        config: &RequestConfig,
    ) -> Result<Value, FetchError> {
        let mut req = self
            .http
            .request(config.method.clone(), resource)
            .headers(header_map(config)?);

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(body) = &config.json_body {
            req = req.json(body);
        }
        if let Some(timeout) = config.timeout {
            req = req.timeout(timeout);
        }

        let res = req.send().await.map_err(FetchError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            debug!(
                %status,
                body = %truncate_body(&body),
                "non-success response"
            );
            return Err(FetchError::status(status.as_u16(), status.canonical_reason()));
        }

        let body = res.text().await.map_err(FetchError::Transport)?;
        serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

fn header_map(config: &RequestConfig) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::with_capacity(config.headers.len());
    for (name, value) in &config.headers {
        let invalid = || FetchError::InvalidHeader { name: name.clone() };
        let key = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let val = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.insert(key, val);
    }
    Ok(headers)
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };
    use std::time::Duration;

    #[tokio::test]
    async fn parses_json_array_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "title": "hello" }])),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new();
        let value = transport
            .fetch_json(&format!("{}/posts", server.uri()), &RequestConfig::default())
            .await
            .expect("request should succeed");

        assert_eq!(value, json!([{ "id": 1, "title": "hello" }]));
    }

    #[tokio::test]
    async fn non_success_status_becomes_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let err = HttpTransport::new()
            .fetch_json(&format!("{}/nope", server.uri()), &RequestConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { code: 404, .. }));
        assert_eq!(err.to_string(), "HTTP 404 Not Found");
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = HttpTransport::new()
            .fetch_json(&server.uri(), &RequestConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn applies_headers_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(header("x-demo", "yes"))
            .and(query_param("current_weather", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let config = RequestConfig::default()
            .with_header("x-demo", "yes")
            .with_query("current_weather", "true");

        let value = HttpTransport::new()
            .fetch_json(&format!("{}/v1/forecast", server.uri()), &config)
            .await
            .expect("request should match the mock");

        assert_eq!(value, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn posts_json_body_with_chosen_method() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "title": "hello", "userId": 1 })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 101 })))
            .expect(1)
            .mount(&server)
            .await;

        let config = RequestConfig::default()
            .with_method(reqwest::Method::POST)
            .with_json_body(json!({ "title": "hello", "userId": 1 }));

        let value = HttpTransport::new()
            .fetch_json(&format!("{}/posts", server.uri()), &config)
            .await
            .expect("POST should match the mock");

        assert_eq!(value, json!({ "id": 101 }));
    }

    #[tokio::test]
    async fn slow_server_hits_request_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = RequestConfig::default().with_timeout(Duration::from_millis(100));
        let err = HttpTransport::new()
            .fetch_json(&server.uri(), &config)
            .await
            .unwrap_err();

        match err {
            FetchError::Transport(source) => assert!(source.is_timeout()),
            other => panic!("expected a timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_reports_status_not_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "retry": true })))
            .mount(&server)
            .await;

        let err = HttpTransport::new()
            .fetch_json(&server.uri(), &RequestConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");
    }

    #[tokio::test]
    async fn rejects_invalid_header_name() {
        let config = RequestConfig::default().with_header("bad header", "x");
        let err = HttpTransport::new()
            .fetch_json("http://127.0.0.1:9/", &config)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::InvalidHeader { .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let err = HttpTransport::new()
            .fetch_json("http://127.0.0.1:1/", &RequestConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
        assert!(err.to_string().starts_with("Network error"));
    }

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
        let long = "x".repeat(500);
        assert_eq!(truncate_body(&long).len(), 200);
    }
}
