//! reqwest-backed transport with the fixed OAuth client policy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Method;
use tracing::debug;

use super::transport::{collect_headers, Response, Transport};
use crate::error::Error;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,
    /// Total time allowed for a request.
    pub timeout: Duration,
    /// Maximum number of redirects followed.
    pub max_redirects: usize,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            user_agent: format!("oauth-manager/{} (OAuth20Client)", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Transport executing requests with reqwest.
///
/// TLS certificates are always verified, requests use HTTP/1.1 and are never retried.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the default policy.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a transport with a custom policy.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .http1_only()
            .build()?;

        Ok(Self { client })
    }

    fn build_request(
        &self,
        method: Method,
        url: &str,
        parameters: &[(String, String)],
    ) -> reqwest::RequestBuilder {
        match method {
            Method::GET | Method::HEAD => self.client.request(method, url).query(parameters),
            Method::POST => self.client.post(url).form(parameters),
            other => {
                let request = self.client.request(other, url);
                if parameters.is_empty() {
                    request
                } else {
                    request.form(parameters)
                }
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        parameters: &[(String, String)],
        headers: &[(String, String)],
    ) -> Response {
        debug!("{} {}", method, url);

        let mut request = self.build_request(method, url, parameters);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Request to {} failed: {}", url, e);
                return Response::failed(e.to_string());
            }
        };

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        match response.text().await {
            Ok(content) => Response {
                status,
                headers,
                error: String::new(),
                content,
            },
            Err(e) => Response {
                status,
                headers,
                error: e.to_string(),
                content: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_config_default() {
        let config = HttpClientConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.contains("OAuth20Client"));
    }

    #[tokio::test]
    async fn test_build_transport() {
        let transport = HttpTransport::new();
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn test_get_encodes_parameters_in_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/me")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("fields".into(), "id,name".into()),
                Matcher::UrlEncoded("access_token".into(), "abc".into()),
            ]))
            .with_status(200)
            .with_body("{\"id\":\"1\"}")
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let response = transport
            .request(
                Method::GET,
                &format!("{}/me", server.url()),
                &params(&[("fields", "id,name"), ("access_token", "abc")]),
                &[],
            )
            .await;

        mock.assert_async().await;
        assert_eq!(response.status, 200);
        assert_eq!(response.content, "{\"id\":\"1\"}");
        assert!(response.error.is_empty());
    }

    #[tokio::test]
    async fn test_post_sends_form_body_and_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_header("accept", "application/json")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("code".into(), "xyz".into()),
            ]))
            .with_status(200)
            .with_header("x-request-id", "1")
            .with_header("x-request-id", "2")
            .with_body("ok")
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let response = transport
            .request(
                Method::POST,
                &format!("{}/token", server.url()),
                &params(&[("grant_type", "authorization_code"), ("code", "xyz")]),
                &params(&[("Accept", "application/json")]),
            )
            .await;

        mock.assert_async().await;
        assert_eq!(response.content, "ok");
        assert_eq!(
            response.header("X-Request-Id"),
            Some(&["1".to_string(), "2".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_delete_sends_custom_method() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/item")
            .match_body(Matcher::UrlEncoded("id".into(), "7".into()))
            .with_status(204)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let response = transport
            .request(
                Method::DELETE,
                &format!("{}/item", server.url()),
                &params(&[("id", "7")]),
                &[],
            )
            .await;

        mock.assert_async().await;
        assert_eq!(response.status, 204);
        assert!(!response.has_content());
    }

    #[tokio::test]
    async fn test_http_error_status_is_not_a_transport_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not here")
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let response = transport
            .request(Method::GET, &format!("{}/missing", server.url()), &[], &[])
            .await;

        assert_eq!(response.status, 404);
        assert_eq!(response.content, "not here");
        assert!(response.error.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_reports_error_field() {
        let transport = HttpTransport::new().unwrap();
        let response = transport
            .request(Method::GET, "http://127.0.0.1:1/unreachable", &[], &[])
            .await;

        assert_eq!(response.status, 0);
        assert!(!response.error.is_empty());
        assert!(!response.has_content());
    }
}
