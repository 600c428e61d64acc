//! HTTP transport layer.
//!
//! A transport sends one request and hands back the raw response. It never
//! inspects the status code; that is the job of [`crate::response`].

use crate::config::GitHubAdminConfig;
use crate::errors::{GitHubError, GitHubResult};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use std::collections::HashMap;

/// HTTP request to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Creates a new HTTP request.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Gets a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// HTTP response received.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a response with no headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Checks if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Gets a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Gets the GitHub request ID.
    pub fn request_id(&self) -> Option<&str> {
        self.get_header("x-github-request-id")
    }
}

fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// HTTP transport trait for making requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends an HTTP request and returns the raw response.
    async fn send(&self, request: HttpRequest) -> GitHubResult<HttpResponse>;
}

/// Default HTTP transport using reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport honoring the proxy, TLS and timeout settings.
    pub fn new(config: &GitHubAdminConfig) -> GitHubResult<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_tls);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(ref url) = config.proxy.http {
            let proxy = reqwest::Proxy::http(url.as_str()).map_err(|e| {
                GitHubError::configuration(format!("Invalid HTTP proxy {}: {}", url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        if let Some(ref url) = config.proxy.https {
            let proxy = reqwest::Proxy::https(url.as_str()).map_err(|e| {
                GitHubError::configuration(format!("Invalid HTTPS proxy {}: {}", url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            GitHubError::configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> GitHubResult<HttpResponse> {
        let mut req_builder = self.client.request(request.method, &request.url);

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;

    #[test]
    fn test_http_request_builder() {
        let request = HttpRequest::new(Method::POST, "https://example.com")
            .with_header("Content-Type", "application/json")
            .with_body("{}");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.get_header("content-type"), Some("application/json"));
        assert_eq!(request.body, Some(Bytes::from("{}")));
    }

    #[test]
    fn test_response_status_classes() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }

    #[test]
    fn test_response_header_lookup() {
        let mut response = HttpResponse::new(200, "[]");
        response
            .headers
            .insert("X-GitHub-Request-Id".to_string(), "ABCD:1234".to_string());

        assert_eq!(response.request_id(), Some("ABCD:1234"));
        assert_eq!(response.get_header("missing"), None);
    }

    #[test]
    fn test_transport_with_proxy_and_no_verify() {
        let config = GitHubAdminConfig {
            proxy: ProxyConfig::all("http://proxy.internal:3128"),
            verify_tls: false,
            ..Default::default()
        };
        assert!(ReqwestTransport::new(&config).is_ok());
    }
}
