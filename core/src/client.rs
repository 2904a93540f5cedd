//! Time-bounded JSON request client for the notes API.
//!
//! # Design
//! `RequestClient` holds an immutable `ClientConfig` and a shared
//! `Transport`, and carries no mutable state between calls. Each call builds
//! one `HttpRequest`, races the transport against its own timer until the
//! response status and headers arrive, and folds every outcome into
//! `Result<T, ApiError>`:
//!
//! - timer fires first: the transport future is dropped and the call fails
//!   with `Timeout` / 408;
//! - transport error: `Network`, no status;
//! - non-2xx status: `Http` with the status and whatever body text is
//!   readable;
//! - 2xx status: the body parsed as JSON, then decoded into `T`. A body that
//!   is not JSON at all is treated as `{}` instead of failing; JSON of the
//!   wrong shape for `T` is a `Network` error.
//!
//! The timer is disarmed as soon as the response head arrives; reading the
//! body afterwards is not timed. The timer lives inside the call's future,
//! so it is released on every exit path and never fires after the call
//! returns.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// Per-call request descriptor.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: HttpMethod,
    /// Caller headers. A key equal (ignoring case) to a default header
    /// replaces it.
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Overrides the configured default timeout for this call. A zero
    /// duration has already elapsed: the call times out without being sent.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Asynchronous client issuing one bounded-time HTTP call per operation.
#[derive(Clone)]
pub struct RequestClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RequestClient {
    /// Client using the default reqwest-backed transport.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Fails if `config` has an empty base URL or a zero timeout.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(path, RequestOptions { method: HttpMethod::Get, ..options })
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let body = encode_body(body)?;
        self.request(path, RequestOptions { method: HttpMethod::Post, body, ..options })
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let body = encode_body(body)?;
        self.request(path, RequestOptions { method: HttpMethod::Put, body, ..options })
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(path, RequestOptions { method: HttpMethod::Delete, ..options })
            .await
    }

    /// Issue one call to `base_url + path`. Every failure is an `ApiError`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let timeout = options.timeout.unwrap_or_else(|| self.config.timeout());
        let request = self.build_request(path, options)?;
        let method = request.method;
        let url = request.url.clone();
        let timeout_ms = timeout.as_millis() as u64;

        if timeout.is_zero() {
            warn!(%method, %url, "request has a zero timeout, not sending");
            return Err(ApiError::timeout());
        }

        debug!(%method, %url, timeout_ms, "dispatching request");
        let started = Instant::now();

        let response = match tokio::time::timeout(timeout, self.transport.send(request)).await {
            Err(_elapsed) => {
                warn!(%method, %url, timeout_ms, "request timed out");
                return Err(ApiError::timeout());
            }
            Ok(Err(err)) => {
                warn!(%method, %url, error = %err, "request failed before a response");
                return Err(err.into());
            }
            Ok(Ok(response)) => response,
        };

        debug!(
            %method,
            %url,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response received"
        );
        parse_response(&url, response).await
    }

    /// Build the outbound request: absolute URL, merged headers, JSON body.
    pub fn build_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        let body = options
            .body
            .map(|value| serde_json::to_string(&value))
            .transpose()
            .map_err(|e| ApiError::network(e.to_string()))?;

        Ok(HttpRequest {
            method: options.method,
            url: format!("{}{}", self.config.base_url, path),
            headers: merge_headers(options.headers),
            body,
        })
    }
}

fn encode_body<B: Serialize + ?Sized>(
    body: Option<&B>,
) -> Result<Option<serde_json::Value>, ApiError> {
    body.map(serde_json::to_value)
        .transpose()
        .map_err(|e| ApiError::network(e.to_string()))
}

/// Default JSON content type first; caller headers replace defaults with the
/// same (case-insensitive) key and otherwise keep their order.
fn merge_headers(custom: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
    for (key, value) in custom {
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&key));
        headers.push((key, value));
    }
    headers
}

/// Read the body and map the exchange to the caller's type.
async fn parse_response<T: DeserializeOwned>(
    url: &str,
    response: HttpResponse,
) -> Result<T, ApiError> {
    let status = response.status;
    if !response.is_success() {
        let text = response.text().await;
        warn!(%url, status, "request returned error status");
        return Err(ApiError::http(status, &text));
    }

    // An unreadable body is handled like one that is not JSON.
    let body = response.bytes().await.unwrap_or_default();
    let value = serde_json::from_slice::<Value>(&body).unwrap_or_else(|err| {
        warn!(%url, status, error = %err, "response body is not JSON, using empty object");
        Value::Object(serde_json::Map::new())
    });

    serde_json::from_value(value).map_err(|err| {
        warn!(%url, status, error = %err, "response does not match the expected type");
        ApiError::network(format!("Failed to decode response: {err}"))
    })
}
