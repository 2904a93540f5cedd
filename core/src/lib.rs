//! Asynchronous request layer for the notes API.
//!
//! # Overview
//! `RequestClient` wraps a pluggable HTTP `Transport` with a uniform
//! contract: each call makes exactly one bounded-time exchange and resolves
//! to the caller's JSON type or to a single `ApiError`, whatever went wrong.
//!
//! # Design
//! - `RequestClient` is stateless apart from an injected `ClientConfig`.
//! - The transport only moves bytes (`HttpRequest` in, `HttpResponse` out);
//!   timeouts, status interpretation and decoding stay in the client.
//! - `ReqwestTransport` is the default transport; tests substitute stubs.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{RequestClient, RequestOptions};
pub use config::{ClientConfig, DEFAULT_TIMEOUT_MS};
pub use error::{ApiError, ConfigError, ErrorKind, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{CreateNote, Note, SummaryResponse, UpdateNote};
