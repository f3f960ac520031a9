//! Minimal HTTP transport capability.
//!
//! The upload client's retry/backoff logic talks to this trait rather than a
//! concrete HTTP stack, so tests can script status sequences with an
//! in-memory fake. The production implementation is a thin reqwest wrapper.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::error::{ApiError, Result};

/// A single POST request as the transport sees it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    /// Full Content-Type header value, including any multipart boundary.
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Status and body of a completed exchange.
///
/// Any status the server answered with counts as a response here; only
/// network-layer failures surface as errors from [`HttpTransport::send`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body rendered as lossy text for diagnostics.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Capability to send one POST request and await the full response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and collect the response body.
    ///
    /// Returns `ApiError::Transport` only for network-layer failures
    /// (connection reset, DNS, timeout); non-2xx statuses are returned as
    /// ordinary responses for the caller to classify.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Production transport backed by a pooled reqwest client.
///
/// Configured for long-running uploads: processing happens server-side and
/// can take minutes, so the request timeout defaults to 600 seconds rather
/// than the usual tens of seconds.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with the given request/response timeout.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .map_err(|e| ApiError::Transport(Box::new(e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let response = self
            .client
            .post(request.url.clone())
            .header(CONTENT_TYPE, &request.content_type)
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| ApiError::Transport(Box::new(e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(Box::new(e)))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}
