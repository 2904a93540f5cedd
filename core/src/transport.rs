//! Transport seam between `RequestClient` and the network.
//!
//! # Design
//! `Transport` performs exactly one HTTP exchange. `send` resolves as soon as
//! the status and headers arrive, with the body left unread inside the
//! `HttpResponse`, or fails with a `TransportError`. It does not apply time
//! bounds or interpret status codes; both belong to the client. Dropping the
//! future returned by `send` must abort the exchange.

use async_trait::async_trait;
use tracing::warn;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client. It should not carry its own timeout.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (key.as_str().to_string(), v.to_string()))
            })
            .collect();

        let url = request.url;
        Ok(HttpResponse::new(status, headers, async move {
            response.bytes().await.map(|bytes| bytes.to_vec()).map_err(|err| {
                warn!(%url, status, error = %err, "failed to read response body");
                TransportError::from(err)
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_map_to_reqwest() {
        assert_eq!(to_reqwest_method(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(to_reqwest_method(HttpMethod::Post), reqwest::Method::POST);
        assert_eq!(to_reqwest_method(HttpMethod::Put), reqwest::Method::PUT);
        assert_eq!(to_reqwest_method(HttpMethod::Delete), reqwest::Method::DELETE);
    }

    #[tokio::test]
    async fn malformed_url_is_a_transport_error() {
        let transport = ReqwestTransport::new();
        let err = transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: "not a url/notes".to_string(),
                headers: Vec::new(),
                body: None,
            })
            .await
            .unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
