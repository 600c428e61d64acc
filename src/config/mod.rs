//! Configuration types for the GitHub administration client.

use crate::errors::{GitHubError, GitHubErrorKind};
use std::time::Duration;

/// Default GitHub REST API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default GitHub GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://github.com/api/graphql";

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = "integrations-github-admin/0.1.0";

/// Proxy settings, one optional proxy URL per scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy used for `http://` targets.
    pub http: Option<String>,
    /// Proxy used for `https://` targets.
    pub https: Option<String>,
}

impl ProxyConfig {
    /// Routes both schemes through the same proxy.
    pub fn all(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            http: Some(url.clone()),
            https: Some(url),
        }
    }

    /// Returns true if no proxy is configured.
    pub fn is_empty(&self) -> bool {
        self.http.is_none() && self.https.is_none()
    }
}

/// GitHub administration client configuration.
#[derive(Debug, Clone)]
pub struct GitHubAdminConfig {
    /// REST API base URL. For GitHub Enterprise: `https://<host>/api/v3`.
    pub base_url: String,
    /// GraphQL endpoint. For GitHub Enterprise: `https://<host>/api/graphql`.
    pub graphql_url: String,
    /// Proxy settings.
    pub proxy: ProxyConfig,
    /// Verify TLS certificates.
    pub verify_tls: bool,
    /// User-Agent header.
    pub user_agent: String,
    /// Request timeout; `None` leaves it to the HTTP stack.
    pub timeout: Option<Duration>,
}

impl Default for GitHubAdminConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            proxy: ProxyConfig::default(),
            verify_tls: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

impl GitHubAdminConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> GitHubAdminConfigBuilder {
        GitHubAdminConfigBuilder::new()
    }

    /// Builds a configuration from `GITHUB_API_URL`, `GITHUB_GRAPHQL_URL`
    /// and `GITHUB_VERIFY_TLS`, falling back to defaults.
    pub fn from_env() -> Result<Self, GitHubError> {
        let mut builder = Self::builder();

        if let Ok(url) = std::env::var("GITHUB_API_URL") {
            builder = builder.base_url(url);
        }
        if let Ok(url) = std::env::var("GITHUB_GRAPHQL_URL") {
            builder = builder.graphql_url(url);
        }
        if let Ok(flag) = std::env::var("GITHUB_VERIFY_TLS") {
            builder = builder.verify_tls(parse_flag(&flag)?);
        }

        builder.build()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), GitHubError> {
        validate_url("Base URL", &self.base_url)?;
        validate_url("GraphQL URL", &self.graphql_url)?;

        for proxy in [&self.proxy.http, &self.proxy.https].into_iter().flatten() {
            url::Url::parse(proxy).map_err(|e| {
                GitHubError::configuration(format!("Invalid proxy URL {}: {}", proxy, e))
            })?;
        }

        if self.user_agent.is_empty() {
            return Err(GitHubError::configuration("User-Agent is required by GitHub API"));
        }

        Ok(())
    }
}

fn validate_url(name: &str, value: &str) -> Result<(), GitHubError> {
    if value.is_empty() {
        return Err(GitHubError::new(
            GitHubErrorKind::InvalidBaseUrl,
            format!("{} cannot be empty", name),
        ));
    }

    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(GitHubError::new(
            GitHubErrorKind::InvalidBaseUrl,
            format!("{} must start with http:// or https://", name),
        ));
    }

    url::Url::parse(value).map_err(|e| {
        GitHubError::new(
            GitHubErrorKind::InvalidBaseUrl,
            format!("{} is not a valid URL: {}", name, e),
        )
    })?;

    Ok(())
}

fn parse_flag(value: &str) -> Result<bool, GitHubError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(GitHubError::configuration(format!(
            "GITHUB_VERIFY_TLS must be true or false, got {}",
            other
        ))),
    }
}

/// Builder for GitHubAdminConfig.
#[derive(Debug, Default)]
pub struct GitHubAdminConfigBuilder {
    base_url: Option<String>,
    graphql_url: Option<String>,
    proxy: Option<ProxyConfig>,
    verify_tls: Option<bool>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl GitHubAdminConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the REST base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the GraphQL endpoint.
    pub fn graphql_url(mut self, url: impl Into<String>) -> Self {
        self.graphql_url = Some(url.into());
        self
    }

    /// Sets the proxy settings.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Enables or disables TLS certificate verification.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = Some(verify);
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Result<GitHubAdminConfig, GitHubError> {
        let config = GitHubAdminConfig {
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            graphql_url: self
                .graphql_url
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
            proxy: self.proxy.unwrap_or_default(),
            verify_tls: self.verify_tls.unwrap_or(true),
            user_agent: self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: self.timeout,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GitHubAdminConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.graphql_url, DEFAULT_GRAPHQL_URL);
        assert!(config.verify_tls);
        assert!(config.proxy.is_empty());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = GitHubAdminConfig::builder()
            .base_url("https://github.example.com/api/v3")
            .graphql_url("https://github.example.com/api/graphql")
            .proxy(ProxyConfig::all("http://proxy.internal:3128"))
            .verify_tls(false)
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://github.example.com/api/v3");
        assert_eq!(config.graphql_url, "https://github.example.com/api/graphql");
        assert_eq!(config.proxy.https.as_deref(), Some("http://proxy.internal:3128"));
        assert!(!config.verify_tls);
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = GitHubAdminConfig::builder().base_url("invalid-url").build();
        assert_eq!(*result.unwrap_err().kind(), GitHubErrorKind::InvalidBaseUrl);
    }

    #[test]
    fn test_invalid_graphql_url() {
        let result = GitHubAdminConfig::builder().graphql_url("").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_proxy() {
        let result = GitHubAdminConfig::builder()
            .proxy(ProxyConfig {
                http: Some("not a url".to_string()),
                https: None,
            })
            .build();
        assert_eq!(
            *result.unwrap_err().kind(),
            GitHubErrorKind::InvalidConfiguration
        );
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
