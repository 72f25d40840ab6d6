//! Transport trait and the normalized response it produces.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;

/// Ordered `(name, value)` pairs used for query strings, form bodies and request headers.
pub type Parameters = Vec<(String, String)>;

/// Normalized result of a single HTTP request.
///
/// A transport-level failure (DNS, TLS, timeout) is not an `Err`: it is reported through
/// `error` with a `status` of `0` and empty `content`. Callers treat empty `content` as failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// HTTP status code, `0` when no response was received.
    pub status: u16,
    /// Response headers in arrival order, repeated headers accumulate under one name.
    pub headers: HashMap<String, Vec<String>>,
    /// Transport error message, empty on success.
    pub error: String,
    /// Response body.
    pub content: String,
}

impl Response {
    /// Build the response reported when the request never completed.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Default::default()
        }
    }

    /// All values received for a header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// Returns true when the body is usable.
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

/// Accumulate response headers by name, values trimmed, in the order they arrived.
pub(crate) fn collect_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
    let mut collected: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes()).trim().to_string();
        collected
            .entry(name.as_str().trim().to_string())
            .or_default()
            .push(value);
    }
    collected
}

/// Executes one HTTP request and returns a structured result.
///
/// Implementations never fail for ordinary HTTP-level problems and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a request.
    ///
    /// # Arguments
    ///
    /// * `method` - `GET` and `HEAD` encode `parameters` into the query string, `POST` sends
    ///   them as a form body, any other method sends them as a form body when non-empty
    /// * `url` - Absolute request URL
    /// * `parameters` - Query or body parameters
    /// * `headers` - Extra request headers
    async fn request(
        &self,
        method: Method,
        url: &str,
        parameters: &[(String, String)],
        headers: &[(String, String)],
    ) -> Response;
}
