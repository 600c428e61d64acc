//! Credentials and authorization header derivation.
//!
//! GitHub accepts the same personal token in two forms: REST calls use HTTP
//! basic auth (`user:token`), GraphQL calls use the `token` scheme. Both header
//! values are derived once, when the credentials are built.

use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

/// Which header form a request is authenticated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Basic base64(user:token)`.
    Basic,
    /// `Authorization: token <token>`.
    Token,
}

/// Account identifier and secret token.
#[derive(Clone)]
pub struct Credentials {
    user: String,
    token: SecretString,
    basic_header: SecretString,
    token_header: SecretString,
}

impl Credentials {
    /// Creates credentials for a user account and personal token.
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        let user = user.into();
        let token = token.into();
        let encoded = STANDARD.encode(format!("{}:{}", user, token));

        Self {
            basic_header: SecretString::new(format!("Basic {}", encoded)),
            token_header: SecretString::new(format!("token {}", token)),
            token: SecretString::new(token),
            user,
        }
    }

    /// Reads credentials from `GITHUB_USER` and `GITHUB_TOKEN`.
    pub fn from_env() -> GitHubResult<Self> {
        Self::from_env_vars("GITHUB_USER", "GITHUB_TOKEN")
    }

    /// Reads credentials from custom environment variables.
    pub fn from_env_vars(user_var: &str, token_var: &str) -> GitHubResult<Self> {
        let read = |name: &str| {
            std::env::var(name).map_err(|_| {
                GitHubError::new(
                    GitHubErrorKind::MissingAuth,
                    format!("Environment variable {} not set", name),
                )
            })
        };
        Ok(Self::new(read(user_var)?, read(token_var)?))
    }

    /// Gets the account identifier.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Gets the raw token.
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Returns the Authorization header value for the given scheme.
    pub fn header_value(&self, scheme: AuthScheme) -> &str {
        match scheme {
            AuthScheme::Basic => self.basic_header.expose_secret(),
            AuthScheme::Token => self.token_header.expose_secret(),
        }
    }

    /// Gets the token prefix for logging.
    pub fn token_prefix(&self) -> &'static str {
        let exposed = self.token.expose_secret();
        if exposed.starts_with("ghp_") {
            "ghp_***"
        } else if exposed.starts_with("github_pat_") {
            "github_pat_***"
        } else {
            "***"
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &self.token_prefix())
            .finish()
    }
}
