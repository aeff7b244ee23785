//! HTTP transport abstraction.
//!
//! The executor and the refresh coordinator talk to the network through
//! the [`HttpTransport`] trait so tests can substitute a recording mock.
//! The production implementation wraps `reqwest`.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::ClientSettings;
use crate::descriptor::Method;
use crate::error::NetworkError;

/// User agent string for the snapkeep client.
const USER_AGENT: &str = concat!("snapkeep/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Wire Request / Response
// ============================================================================

/// A fully built wire request, ready to send.
#[derive(Debug, Clone)]
pub struct WireRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including query items.
    pub url: Url,
    /// Headers, including any `Content-Type`.
    pub headers: Vec<(String, String)>,
    /// Serialized body, if any.
    pub body: Option<Vec<u8>>,
}

/// A raw wire response.
#[derive(Debug, Clone)]
pub struct WireResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl WireResponse {
    /// Returns true if the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Looks up a response header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Trait for executing wire requests.
///
/// Transport-level failures (DNS, TLS, timeout) surface as
/// [`NetworkError::Transport`]; HTTP status handling is the caller's job.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns the raw response.
    async fn execute(&self, request: WireRequest) -> Result<WireResponse, NetworkError>;
}

// ============================================================================
// Reqwest Transport
// ============================================================================

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given client settings.
    pub fn new(settings: &ClientSettings) -> Result<Self, NetworkError> {
        let inner = reqwest::Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { inner })
    }

    fn reqwest_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: WireRequest) -> Result<WireResponse, NetworkError> {
        let mut builder = self
            .inner
            .request(Self::reqwest_method(request.method), request.url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        debug!(method = %request.method, url = %request.url, "Sending request");

        let response = builder.send().await?;
        let status = response.status().as_u16();

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await?.to_vec();

        debug!(status = status, bytes = body.len(), "Response received");

        Ok(WireResponse {
            status,
            headers,
            body,
        })
    }
}

// ============================================================================
// Mock Transport
// ============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// A canned mock response.
    #[derive(Debug, Clone)]
    pub struct CannedResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: Vec<u8>,
    }

    /// A recorded wire request.
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub method: Method,
        pub url: Url,
        pub headers: Vec<(String, String)>,
        pub body: Option<Vec<u8>>,
    }

    impl RecordedRequest {
        /// Looks up a request header, case-insensitively.
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    /// Mock transport with canned responses keyed by method and path.
    ///
    /// Responses for a key are consumed in order; the last one repeats
    /// once the queue is down to a single entry. An optional delay makes
    /// in-flight overlap deterministic in concurrency tests.
    #[derive(Debug, Clone, Default)]
    pub struct MockTransport {
        responses: Arc<Mutex<HashMap<String, VecDeque<CannedResponse>>>>,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
        delay: Option<Duration>,
    }

    impl MockTransport {
        /// Creates an empty mock transport.
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every response wait before resolving.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Queues a response for `method path`.
        pub fn on(self, method: Method, path: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
            self.on_with_headers(method, path, status, Vec::new(), body)
        }

        /// Queues a response with headers for `method path`.
        pub fn on_with_headers(
            self,
            method: Method,
            path: &str,
            status: u16,
            headers: Vec<(String, String)>,
            body: impl Into<Vec<u8>>,
        ) -> Self {
            self.responses
                .lock()
                .unwrap()
                .entry(Self::key(method, path))
                .or_default()
                .push_back(CannedResponse {
                    status,
                    headers,
                    body: body.into(),
                });
            self
        }

        /// Queues a 200 response with a JSON body.
        pub fn on_json<T: serde::Serialize>(self, method: Method, path: &str, data: &T) -> Self {
            let body = serde_json::to_vec(data).expect("Failed to serialize mock data");
            self.on(method, path, 200, body)
        }

        /// Returns all recorded requests.
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        /// Returns the total number of requests made.
        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        /// Returns the number of requests made to a path.
        pub fn calls_to(&self, path: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.url.path() == path)
                .count()
        }

        fn key(method: Method, path: &str) -> String {
            format!("{method} {path}")
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn execute(&self, request: WireRequest) -> Result<WireResponse, NetworkError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                method: request.method,
                url: request.url.clone(),
                headers: request.headers.clone(),
                body: request.body.clone(),
            });

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let key = Self::key(request.method, request.url.path());
            let mut responses = self.responses.lock().unwrap();
            let queue = responses.get_mut(&key).ok_or_else(|| {
                NetworkError::Transport(format!("No mock response configured for {key}"))
            })?;

            let canned = if queue.len() > 1 {
                queue.pop_front().ok_or_else(|| {
                    NetworkError::Transport(format!("Mock queue exhausted for {key}"))
                })?
            } else {
                queue
                    .front()
                    .cloned()
                    .ok_or_else(|| NetworkError::Transport(format!("Mock queue empty for {key}")))?
            };

            Ok(WireResponse {
                status: canned.status,
                headers: canned.headers,
                body: canned.body,
            })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
