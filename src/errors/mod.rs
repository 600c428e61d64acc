//! Errors surfaced by the client.
//!
//! Transport failures, non-2xx responses and GraphQL payloads carrying an
//! `errors` array all end up as one [`GitHubError`]. The message is never
//! rewritten: a failed REST call keeps the raw response body, a failed
//! GraphQL call keeps the numbered list built by the response normalizer.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Result type alias for GitHub operations.
pub type GitHubResult<T> = Result<T, GitHubError>;

/// What went wrong, independent of the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitHubErrorKind {
    /// No user or token was supplied.
    MissingAuth,
    /// REST base URL or GraphQL URL failed validation.
    InvalidBaseUrl,
    /// Any other configuration problem, including proxy and TLS setup.
    InvalidConfiguration,
    /// HTTP 400.
    ValidationError,
    /// A caller-supplied value could not be used, e.g. a repository record
    /// without `node_id`.
    InvalidParameter,
    /// HTTP 422.
    UnprocessableEntity,
    /// HTTP 401.
    BadCredentials,
    /// HTTP 403 without an exhausted rate limit.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// HTTP 410.
    Gone,
    /// HTTP 409.
    Conflict,
    /// HTTP 429.
    RateLimitExceeded,
    /// DNS, connect or TLS failure.
    ConnectionFailed,
    /// The configured timeout elapsed.
    Timeout,
    /// HTTP 500.
    InternalError,
    /// HTTP 502.
    BadGateway,
    /// HTTP 503.
    ServiceUnavailable,
    /// A 2xx body that is not the expected JSON shape.
    DeserializationError,
    /// A GraphQL response carrying `errors`.
    QueryError,
    /// Anything else, including unmapped status codes.
    Unknown,
}

impl GitHubErrorKind {
    /// Classifies a non-2xx status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::ValidationError,
            401 => Self::BadCredentials,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            410 => Self::Gone,
            422 => Self::UnprocessableEntity,
            429 => Self::RateLimitExceeded,
            500 => Self::InternalError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            _ => Self::Unknown,
        }
    }

    /// Snake-case name used in `Display` and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingAuth => "missing_auth",
            Self::InvalidBaseUrl => "invalid_base_url",
            Self::InvalidConfiguration => "invalid_configuration",
            Self::ValidationError => "validation_error",
            Self::InvalidParameter => "invalid_parameter",
            Self::UnprocessableEntity => "unprocessable_entity",
            Self::BadCredentials => "bad_credentials",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Gone => "gone",
            Self::Conflict => "conflict",
            Self::RateLimitExceeded => "rate_limit_exceeded",
            Self::ConnectionFailed => "connection_failed",
            Self::Timeout => "timeout",
            Self::InternalError => "internal_error",
            Self::BadGateway => "bad_gateway",
            Self::ServiceUnavailable => "service_unavailable",
            Self::DeserializationError => "deserialization_error",
            Self::QueryError => "query_error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for GitHubErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `x-ratelimit-*` headers of a failed response.
///
/// Informational only: the client never throttles on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// `x-ratelimit-limit`.
    pub limit: u32,
    /// `x-ratelimit-remaining`.
    pub remaining: u32,
    /// `x-ratelimit-reset`, as a UTC time.
    pub reset_at: DateTime<Utc>,
    /// `x-ratelimit-resource`, e.g. `core` or `graphql`.
    pub resource: Option<String>,
}

/// Error returned by every client operation.
#[derive(Error, Debug)]
pub struct GitHubError {
    kind: GitHubErrorKind,
    message: String,
    status_code: Option<u16>,
    request_id: Option<String>,
    rate_limit: Option<RateLimitInfo>,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for GitHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "{} (HTTP {}): {}", self.kind, code, self.message)?,
            None => write!(f, "{}: {}", self.kind, self.message)?,
        }
        if let Some(id) = &self.request_id {
            write!(f, " [request {}]", id)?;
        }
        Ok(())
    }
}

impl GitHubError {
    /// Creates an error with no status, request id or cause.
    pub fn new(kind: GitHubErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            request_id: None,
            rate_limit: None,
            cause: None,
        }
    }

    /// Error for a non-2xx response; `body` becomes the message untouched.
    pub fn from_response(status: u16, body: String, request_id: Option<String>) -> Self {
        Self {
            request_id,
            ..Self::new(GitHubErrorKind::from_status(status), body).with_status(status)
        }
    }

    /// Error for a 2xx GraphQL response carrying `errors`.
    pub fn query(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::QueryError, message)
    }

    /// Error for a body that could not be decoded into the expected shape.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::DeserializationError, message)
    }

    /// Error for invalid client configuration.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::InvalidConfiguration, message)
    }

    /// Attaches the HTTP status.
    pub fn with_status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Attaches the `x-github-request-id` value.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Attaches the rate limit headers of the failed response.
    pub fn with_rate_limit(mut self, info: RateLimitInfo) -> Self {
        self.rate_limit = Some(info);
        self
    }

    /// Attaches the underlying error, exposed through `source()`.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Gets the error kind.
    pub fn kind(&self) -> &GitHubErrorKind {
        &self.kind
    }

    /// The message exactly as it was produced.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets the HTTP status code, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Gets the `x-github-request-id` of the failed response.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Gets the rate limit headers of the failed response.
    pub fn rate_limit(&self) -> Option<&RateLimitInfo> {
        self.rate_limit.as_ref()
    }

    /// True for a 429, or a 403 whose rate limit headers show no quota left.
    pub fn is_rate_limited(&self) -> bool {
        match self.kind {
            GitHubErrorKind::RateLimitExceeded => true,
            GitHubErrorKind::Forbidden => self.rate_limit.as_ref().is_some_and(|r| r.remaining == 0),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            GitHubErrorKind::Timeout
        } else if e.is_connect() {
            GitHubErrorKind::ConnectionFailed
        } else {
            GitHubErrorKind::Unknown
        };
        Self::new(kind, format!("Request failed: {}", e)).with_cause(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use test_case::test_case;

    #[test]
    fn test_display_includes_status_and_request_id() {
        let error = GitHubError::from_response(404, "not found".to_string(), Some("abc123".to_string()));
        assert_eq!(error.to_string(), "not_found (HTTP 404): not found [request abc123]");

        let error = GitHubError::query("Error 1: bad field");
        assert_eq!(error.to_string(), "query_error: Error 1: bad field");
    }

    #[test]
    fn test_from_response_keeps_body_verbatim() {
        let body = "{\"message\":\"Not Found\"}".to_string();
        let error = GitHubError::from_response(404, body.clone(), None);

        assert_eq!(error.message(), body);
        assert_eq!(error.status_code(), Some(404));
        assert_eq!(error.request_id(), None);
        assert!(error.source().is_none());
    }

    #[test_case(400, GitHubErrorKind::ValidationError)]
    #[test_case(401, GitHubErrorKind::BadCredentials)]
    #[test_case(403, GitHubErrorKind::Forbidden)]
    #[test_case(422, GitHubErrorKind::UnprocessableEntity)]
    #[test_case(429, GitHubErrorKind::RateLimitExceeded)]
    #[test_case(502, GitHubErrorKind::BadGateway)]
    #[test_case(418, GitHubErrorKind::Unknown)]
    fn test_kind_from_status(status: u16, kind: GitHubErrorKind) {
        assert_eq!(GitHubErrorKind::from_status(status), kind);
    }

    #[test]
    fn test_rate_limited_forbidden_needs_exhausted_quota() {
        let info = |remaining| RateLimitInfo {
            limit: 5000,
            remaining,
            reset_at: Utc::now(),
            resource: Some("core".to_string()),
        };

        let exhausted = GitHubError::from_response(403, "quota".to_string(), None).with_rate_limit(info(0));
        assert!(exhausted.is_rate_limited());

        let left = GitHubError::from_response(403, "nope".to_string(), None).with_rate_limit(info(10));
        assert!(!left.is_rate_limited());

        assert!(!GitHubError::from_response(403, "nope".to_string(), None).is_rate_limited());
        assert!(GitHubError::from_response(429, String::new(), None).is_rate_limited());
    }
}
