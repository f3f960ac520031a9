//! HTTP clients for the Mindscape content-processing service.
//!
//! [`UploadClient`] submits a document for processing and decodes the
//! returned palace, retrying with exponential backoff when the server
//! reports itself busy. [`chat::ChatClient`] is the companion single-shot
//! client for concept chat.
//!
//! Clients are constructor-injected and hold only immutable configuration;
//! callers may run any number of uploads concurrently, each independent.

pub mod chat;
pub mod multipart;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::config::Settings;
use crate::error::{ApiError, Result};
use crate::models::Palace;
use self::multipart::MultipartDocument;
use self::transport::{HttpRequest, HttpTransport, ReqwestTransport};

/// Endpoint path for document processing.
const PROCESS_CONTENT_PATH: &str = "/api/process-content";

/// Statuses treated as transient server overload, worth retrying.
const RETRYABLE_STATUSES: [u16; 2] = [503, 504];

/// Join a base URL with an endpoint path, failing fast on misconfiguration.
pub(crate) fn endpoint_url(base: &str, path: &str) -> Result<Url> {
    let joined = format!("{}{}", base.trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", joined, e)))
}

/// Client for the document-processing endpoint.
///
/// Stateless across calls: one `upload` is one logical request/response
/// exchange, with bounded retries for 503/504 folded inside.
pub struct UploadClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl UploadClient {
    /// Build a client with the production reqwest transport.
    pub fn new(settings: &Settings) -> Result<Self> {
        let transport = ReqwestTransport::new(
            Duration::from_secs(settings.request_timeout),
            &settings.user_agent,
        )?;
        Self::with_transport(settings, Arc::new(transport))
    }

    /// Build a client over an injected transport. Tests use this to script
    /// server behavior without a network.
    pub fn with_transport(settings: &Settings, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            transport,
            endpoint: endpoint_url(&settings.base_url, PROCESS_CONTENT_PATH)?,
            max_retries: settings.max_retries,
            backoff_base_secs: settings.backoff_base_secs,
        })
    }

    /// Upload a document and decode the processed palace.
    ///
    /// The multipart body is encoded once with a fresh random boundary;
    /// retries resend the identical bytes. 503 and 504 responses are retried
    /// up to the configured ceiling with exponential backoff (1s, 2s, 4s by
    /// default); transport failures and every other non-2xx status surface
    /// immediately. At most `1 + max_retries` requests are sent per call.
    pub async fn upload(&self, content: &[u8], filename: &str) -> Result<Palace> {
        let document = MultipartDocument::new(filename, content);
        let request = HttpRequest {
            url: self.endpoint.clone(),
            content_type: document.content_type(),
            body: document.body().to_vec(),
        };

        debug!(filename, bytes = request.body.len(), "uploading document");

        let mut response = self.transport.send(&request).await?;
        for retries_done in 0..self.max_retries {
            if response.is_success() || !RETRYABLE_STATUSES.contains(&response.status) {
                break;
            }

            let delay = Duration::from_secs(self.backoff_base_secs << retries_done);
            warn!(
                status = response.status,
                retry = retries_done + 1,
                max_retries = self.max_retries,
                delay_secs = delay.as_secs(),
                "server busy, backing off before retry"
            );
            sleep(delay).await;

            response = self.transport.send(&request).await?;
        }

        if !response.is_success() {
            return Err(ApiError::Server {
                status: response.status,
                body: response.body_text(),
            });
        }

        debug!(status = response.status, bytes = response.body.len(), "processing complete");
        serde_json::from_slice(&response.body).map_err(ApiError::Decoding)
    }
}

#[cfg(test)]
mod tests {
    use super::transport::HttpResponse;
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;
    use tokio::time::Instant;

    const PALACE_BODY: &str = r#"{
        "title": "Test Palace",
        "environment_theme": {"theme": "library"},
        "concepts": [],
        "learning_path": []
    }"#;

    /// Transport that replays a scripted sequence of outcomes and records
    /// every request it was asked to send.
    struct ScriptedTransport {
        script: Mutex<Vec<Result<HttpResponse>>>,
        requests: Mutex<Vec<HttpRequest>>,
        attempts: AtomicUsize,
        first_attempt: Notify,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<HttpResponse>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script),
                requests: Mutex::new(Vec::new()),
                attempts: AtomicUsize::new(0),
                first_attempt: Notify::new(),
            })
        }

        fn status(status: u16, body: &str) -> Result<HttpResponse> {
            Ok(HttpResponse { status, body: body.as_bytes().to_vec() })
        }

        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }

        fn recorded_bodies(&self) -> Vec<Vec<u8>> {
            self.requests.lock().unwrap().iter().map(|r| r.body.clone()).collect()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(request.clone());
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                self.first_attempt.notify_one();
            }
            self.script
                .lock()
                .unwrap()
                .remove(0)
        }
    }

    fn client(transport: Arc<ScriptedTransport>) -> UploadClient {
        let settings = Settings {
            base_url: "https://palace.test".to_string(),
            ..Settings::default()
        };
        UploadClient::with_transport(&settings, transport).unwrap()
    }

    fn transport_failure() -> Result<HttpResponse> {
        Err(ApiError::Transport(Box::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ))))
    }

    #[test]
    fn test_invalid_base_url_fails_at_construction() {
        let settings = Settings {
            base_url: "not a url".to_string(),
            ..Settings::default()
        };
        let result = UploadClient::new(&settings);
        assert!(matches!(result, Err(ApiError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_endpoint_join_handles_trailing_slash() {
        let url = endpoint_url("https://palace.test/", PROCESS_CONTENT_PATH).unwrap();
        assert_eq!(url.as_str(), "https://palace.test/api/process-content");
    }

    #[tokio::test]
    async fn test_success_decodes_palace() {
        let transport = ScriptedTransport::new(vec![ScriptedTransport::status(200, PALACE_BODY)]);
        let palace = client(transport.clone()).upload(b"%PDF-", "doc.pdf").await.unwrap();

        assert_eq!(palace.title, "Test Palace");
        assert_eq!(transport.attempts(), 1);

        // The request carries the multipart body with its boundary header.
        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].url.path(), "/api/process-content");
        assert!(requests[0].content_type.starts_with("multipart/form-data; boundary="));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_on_503_with_backoff() {
        let transport = ScriptedTransport::new(vec![
            ScriptedTransport::status(503, "busy"),
            ScriptedTransport::status(503, "busy"),
            ScriptedTransport::status(200, PALACE_BODY),
        ]);
        let client = client(transport.clone());

        let start = Instant::now();
        let palace = client.upload(b"%PDF-", "doc.pdf").await.unwrap();

        assert_eq!(palace.title, "Test Palace");
        assert_eq!(transport.attempts(), 3);
        // Backoff sleeps of 1s then 2s in virtual time.
        assert_eq!(start.elapsed(), Duration::from_secs(3));

        // Every retry resends byte-identical body.
        let bodies = transport.recorded_bodies();
        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[1], bodies[2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_ceiling_exhausted() {
        let transport = ScriptedTransport::new(vec![
            ScriptedTransport::status(503, "busy"),
            ScriptedTransport::status(503, "busy"),
            ScriptedTransport::status(503, "busy"),
            ScriptedTransport::status(503, "still busy"),
        ]);
        let client = client(transport.clone());

        let start = Instant::now();
        let err = client.upload(b"%PDF-", "doc.pdf").await.unwrap_err();

        assert!(matches!(err, ApiError::Server { status: 503, ref body } if body.as_str() == "still busy"));
        assert_eq!(transport.attempts(), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(1 + 2 + 4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_504_is_retryable() {
        let transport = ScriptedTransport::new(vec![
            ScriptedTransport::status(504, "gateway timeout"),
            ScriptedTransport::status(200, PALACE_BODY),
        ]);
        let palace = client(transport.clone()).upload(b"%PDF-", "doc.pdf").await.unwrap();

        assert_eq!(palace.title, "Test Palace");
        assert_eq!(transport.attempts(), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_status_fails_immediately() {
        let transport =
            ScriptedTransport::new(vec![ScriptedTransport::status(404, "not found")]);
        let err = client(transport.clone()).upload(b"%PDF-", "doc.pdf").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test]
    async fn test_decode_failure_is_not_retried() {
        // 200 but the body is missing the required title field.
        let transport = ScriptedTransport::new(vec![ScriptedTransport::status(
            200,
            r#"{"environment_theme": {"theme": "library"}, "concepts": [], "learning_path": []}"#,
        )]);
        let err = client(transport.clone()).upload(b"%PDF-", "doc.pdf").await.unwrap_err();

        assert!(matches!(err, ApiError::Decoding(_)));
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let transport = ScriptedTransport::new(vec![transport_failure()]);
        let err = client(transport.clone()).upload(b"%PDF-", "doc.pdf").await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_during_backoff_sends_no_further_request() {
        let transport = ScriptedTransport::new(vec![
            ScriptedTransport::status(503, "busy"),
            ScriptedTransport::status(200, PALACE_BODY),
        ]);
        let client = client(transport.clone());

        let handle = tokio::spawn(async move { client.upload(b"%PDF-", "doc.pdf").await });

        // Wait until the first attempt has been sent; the task is now headed
        // into its backoff sleep.
        transport.first_attempt.notified().await;
        assert_eq!(transport.attempts(), 1);
        handle.abort();

        let join_err = handle.await.unwrap_err();
        assert!(join_err.is_cancelled());

        // Even after the backoff window passes, no second request goes out.
        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert_eq!(transport.attempts(), 1);
    }
}
