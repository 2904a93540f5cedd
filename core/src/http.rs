//! HTTP wire types shared between `RequestClient` and its transport.
//!
//! # Design
//! Requests are plain data. A response arrives in two phases: the status
//! line and headers first, then the body, which stays unread inside
//! `HttpResponse` until the client asks for it. The client bounds only the
//! first phase with its timer; reading the body afterwards is untimed.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound HTTP request described as plain data.
///
/// `url` is already the full address (base address plus path).
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// A response whose status and headers have arrived. The body is read
/// lazily by `bytes()` / `text()`.
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    body: BoxFuture<'static, Result<Vec<u8>, TransportError>>,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl HttpResponse {
    /// Response whose body is produced by `body` when first read.
    pub fn new<F>(status: u16, headers: Vec<(String, String)>, body: F) -> Self
    where
        F: Future<Output = Result<Vec<u8>, TransportError>> + Send + 'static,
    {
        Self {
            status,
            headers,
            body: body.boxed(),
        }
    }

    /// Response with an already-buffered body.
    pub fn from_bytes(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self::new(status, headers, futures::future::ready(Ok(body)))
    }

    /// True for statuses in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read the whole body.
    pub async fn bytes(self) -> Result<Vec<u8>, TransportError> {
        self.body.await
    }

    /// Body as text, or an empty string if it cannot be read or is not
    /// valid UTF-8.
    pub async fn text(self) -> String {
        match self.bytes().await {
            Ok(body) => String::from_utf8(body).unwrap_or_default(),
            Err(_) => String::new(),
        }
    }
}
