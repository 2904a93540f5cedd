//! Error types for the notes request layer.
//!
//! # Design
//! Every failure a caller can observe is an `ApiError`: one struct with a
//! `kind` discriminant, a message and an optional status code. Callers branch
//! on `kind()` and read `status()` when present instead of matching a family
//! of error types. `TransportError` and `ConfigError` never cross the public
//! request API; the former is folded into `ApiError` by the client.

use std::fmt;

use thiserror::Error;

/// Status reported for timed-out requests.
pub const TIMEOUT_STATUS: u16 = 408;

const TIMEOUT_MESSAGE: &str = "Request timeout";
const UNKNOWN_MESSAGE: &str = "Unknown error occurred";

/// Discriminant of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The exchange did not finish within the request's time bound.
    Timeout,
    /// The server answered with a status outside 2xx.
    Http,
    /// No usable result was obtained: connect failure, bad request
    /// construction, or a 2xx body that cannot be decoded into the caller's
    /// type. Never carries a status.
    Network,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Http => write!(f, "http error"),
            ErrorKind::Network => write!(f, "network error"),
        }
    }
}

/// The single error shape returned by every `RequestClient` operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
}

impl ApiError {
    pub fn timeout() -> Self {
        Self {
            kind: ErrorKind::Timeout,
            message: TIMEOUT_MESSAGE.to_string(),
            status: Some(TIMEOUT_STATUS),
        }
    }

    /// Non-success response. `body` is whatever text could be read from it.
    pub fn http(status: u16, body: &str) -> Self {
        Self {
            kind: ErrorKind::Http,
            message: format!("Request failed ({status}): {body}"),
            status: Some(status),
        }
    }

    /// Failure before any response. An empty description becomes a generic
    /// message.
    pub fn network(description: impl Into<String>) -> Self {
        let description = description.into();
        let message = if description.trim().is_empty() {
            UNKNOWN_MESSAGE.to_string()
        } else {
            description
        };
        Self {
            kind: ErrorKind::Network,
            message,
            status: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::network(err.to_string())
    }
}

/// Raised by a `Transport` when no response could be obtained.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest's Display hides the root cause (e.g. "connection refused").
        let mut description = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            description.push_str(": ");
            description.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        Self(description)
    }
}

/// Invalid client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Base URL cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid timeout_ms: {0}. Must be positive")]
    InvalidTimeout(u64),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}
