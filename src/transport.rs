//! HTTP boundary between the translation core and the network.
//!
//! Adapters only produce [`HttpRequest`] values and consume [`HttpResponse`]
//! values; connections, TLS and timeouts live behind [`Transport`].

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::error::{LingoError, Result};

/// A fully built provider request, relative to a base URL. Every provider
/// endpoint takes a POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_values(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("host unreachable: {0}")]
    Unreachable(String),

    /// The request could not be built, e.g. a malformed base URL or a header
    /// value with forbidden characters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A response started arriving but its body could not be read.
    #[error("response interrupted: {0}")]
    Interrupted(String),

    #[error("request timed out")]
    Timeout,

    #[error("no response")]
    NoResponse,
}

/// Executes provider requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        base_url: &str,
        request: HttpRequest,
    ) -> std::result::Result<HttpResponse, TransportError>;
}

/// Production transport on top of a shared reqwest client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LingoError::Http)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        base_url: &str,
        request: HttpRequest,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );
        debug!("POST {} ({} bytes)", url, request.body.len());

        let mut builder = self.client.post(&url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();
        debug!("{} answered {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse { status, body })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_builder() {
        TransportError::InvalidRequest(e.to_string())
    } else if e.is_connect() || e.is_request() {
        TransportError::Unreachable(e.to_string())
    } else if e.is_body() || e.is_decode() {
        TransportError::Interrupted(e.to_string())
    } else {
        TransportError::NoResponse
    }
}
