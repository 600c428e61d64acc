//! GitHub administration client.

use crate::auth::{AuthScheme, Credentials};
use crate::config::{GitHubAdminConfig, GitHubAdminConfigBuilder, ProxyConfig};
use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use crate::graphql::GraphQLRequest;
use crate::observability::{Api, Metrics, RequestTimer, TracingHooks};
use crate::pagination::PaginationParams;
use crate::response::{extract_rate_limit, normalize};
use crate::services::*;
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// A decoded GitHub resource record, returned as GitHub sent it.
pub type Record = Value;

const REST_ACCEPT: &str = "application/vnd.github.v3+json";

/// GitHub administration client.
///
/// Holds only read-only state after construction and can be shared across
/// tasks. Every call issues its requests one after another.
pub struct GitHubAdminClient {
    transport: Arc<dyn HttpTransport>,
    config: GitHubAdminConfig,
    credentials: Credentials,
    metrics: Arc<Metrics>,
}

impl GitHubAdminClient {
    /// Creates a client backed by the reqwest transport.
    pub fn new(config: GitHubAdminConfig, credentials: Credentials) -> GitHubResult<Self> {
        config.validate()?;
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Ok(Self::with_transport(config, credentials, transport))
    }

    /// Creates a client with a custom transport.
    pub fn with_transport(
        config: GitHubAdminConfig,
        credentials: Credentials,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            config,
            credentials,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// See [`GitHubAdminConfig::from_env`] and [`Credentials::from_env`].
    pub fn from_env() -> GitHubResult<Self> {
        Self::new(GitHubAdminConfig::from_env()?, Credentials::from_env()?)
    }

    /// Creates a new client builder.
    pub fn builder() -> GitHubAdminClientBuilder {
        GitHubAdminClientBuilder::new()
    }

    /// Gets the configuration.
    pub fn config(&self) -> &GitHubAdminConfig {
        &self.config
    }

    /// Gets the credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Gets the request metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    // Service accessors

    /// Gets the organizations service.
    pub fn organizations(&self) -> OrganizationsService<'_> {
        OrganizationsService::new(self)
    }

    /// Gets the teams service.
    pub fn teams(&self) -> TeamsService<'_> {
        TeamsService::new(self)
    }

    /// Gets the repositories service.
    pub fn repositories(&self) -> RepositoriesService<'_> {
        RepositoriesService::new(self)
    }

    /// Gets the pull requests service.
    pub fn pull_requests(&self) -> PullRequestsService<'_> {
        PullRequestsService::new(self)
    }

    /// Gets the users service.
    pub fn users(&self) -> UsersService<'_> {
        UsersService::new(self)
    }

    /// Gets the branch protection service.
    pub fn branch_protection(&self) -> BranchProtectionService<'_> {
        BranchProtectionService::new(self)
    }

    // REST methods

    /// Makes a GET request.
    pub async fn get(&self, path: &str) -> GitHubResult<Value> {
        self.rest(Method::GET, path, String::new(), Option::<&()>::None)
            .await
    }

    /// Makes a GET request with query parameters.
    ///
    /// `None` fields of `params` are expected to be skipped by its `Serialize`
    /// impl, so absent filters never reach the query string.
    pub async fn get_with_params<P: Serialize>(&self, path: &str, params: &P) -> GitHubResult<Value> {
        let query = encode_query(params)?;
        self.rest(Method::GET, path, query, Option::<&()>::None).await
    }

    /// Fetches one page of a list endpoint.
    pub async fn get_page<P: Serialize>(
        &self,
        path: &str,
        params: &P,
        page: PaginationParams,
    ) -> GitHubResult<Vec<Record>> {
        let mut query = encode_query(params)?;
        let page_query = encode_query(&page.to_query())?;
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&page_query);

        let value = self
            .rest(Method::GET, path, query, Option::<&()>::None)
            .await?;
        into_records(value)
    }

    /// Makes a POST request.
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> GitHubResult<Value> {
        self.rest(Method::POST, path, String::new(), Some(body)).await
    }

    /// Makes a PUT request.
    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> GitHubResult<Value> {
        self.rest(Method::PUT, path, String::new(), Some(body)).await
    }

    /// Makes a DELETE request. The decoded body is usually `null`.
    pub async fn delete(&self, path: &str) -> GitHubResult<Value> {
        self.rest(Method::DELETE, path, String::new(), Option::<&()>::None)
            .await
    }

    // GraphQL

    /// Posts a GraphQL document and returns the whole decoded payload.
    ///
    /// A payload with an `errors` array fails with
    /// [`GitHubErrorKind::QueryError`] even though the status was 2xx.
    pub async fn graphql(&self, document: &str) -> GitHubResult<Value> {
        let body = serde_json::to_vec(&GraphQLRequest::new(document)).map_err(|e| {
            GitHubError::new(
                GitHubErrorKind::InvalidParameter,
                format!("Failed to serialize GraphQL request: {}", e),
            )
        })?;

        let request = HttpRequest::new(Method::POST, self.config.graphql_url.clone())
            .with_header("Authorization", self.credentials.header_value(AuthScheme::Token))
            .with_header("User-Agent", self.config.user_agent.clone())
            .with_header("Content-Type", "application/json")
            .with_body(body);

        self.execute(Api::GraphQL, request).await
    }

    // Internal methods

    async fn rest<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: String,
        body: Option<&B>,
    ) -> GitHubResult<Value> {
        let mut url = self.build_url(path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let mut request = HttpRequest::new(method, url)
            .with_header("Authorization", self.credentials.header_value(AuthScheme::Basic))
            .with_header("Accept", REST_ACCEPT)
            .with_header("User-Agent", self.config.user_agent.clone());

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                GitHubError::new(
                    GitHubErrorKind::InvalidParameter,
                    format!("Failed to serialize request body: {}", e),
                )
            })?;
            request = request
                .with_header("Content-Type", "application/json")
                .with_body(bytes);
        }

        self.execute(Api::Rest, request).await
    }

    async fn execute(&self, api: Api, request: HttpRequest) -> GitHubResult<Value> {
        TracingHooks::on_request_start(api, &request);
        let url = request.url.clone();

        let timer = RequestTimer::start(self.metrics.clone(), api);
        let result = self.transport.send(request).await.and_then(|response| {
            let status = response.status;
            if let Some(info) = extract_rate_limit(&response) {
                TracingHooks::on_rate_limit_update(&info);
            }
            normalize(response).map(|value| (status, value))
        });

        match result {
            Ok((status, value)) => {
                let duration = timer.success();
                TracingHooks::on_request_complete(api, &url, status, duration);
                Ok(value)
            }
            Err(e) => {
                timer.failure(&e);
                TracingHooks::on_request_error(api, &url, &e);
                Err(e)
            }
        }
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

impl std::fmt::Debug for GitHubAdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAdminClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

fn encode_query<P: Serialize + ?Sized>(params: &P) -> GitHubResult<String> {
    serde_urlencoded::to_string(params).map_err(|e| {
        GitHubError::new(
            GitHubErrorKind::InvalidParameter,
            format!("Failed to serialize parameters: {}", e),
        )
    })
}

/// Splits a decoded list response into its records.
fn into_records(value: Value) -> GitHubResult<Vec<Record>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(GitHubError::deserialization(format!(
            "Expected a JSON array, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Builder for GitHubAdminClient.
pub struct GitHubAdminClientBuilder {
    config_builder: GitHubAdminConfigBuilder,
    user: Option<String>,
    token: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl GitHubAdminClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: GitHubAdminConfig::builder(),
            user: None,
            token: None,
            transport: None,
        }
    }

    /// Sets the account identifier.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the personal token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the REST base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(url);
        self
    }

    /// Sets the GraphQL endpoint.
    pub fn graphql_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.graphql_url(url);
        self
    }

    /// Sets the proxy settings.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config_builder = self.config_builder.proxy(proxy);
        self
    }

    /// Enables or disables TLS certificate verification.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.config_builder = self.config_builder.verify_tls(verify);
        self
    }

    /// Sets the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Uses a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client.
    pub fn build(self) -> GitHubResult<GitHubAdminClient> {
        let config = self.config_builder.build()?;

        let (user, token) = match (self.user, self.token) {
            (Some(user), Some(token)) => (user, token),
            _ => {
                return Err(GitHubError::new(
                    GitHubErrorKind::MissingAuth,
                    "Both user and token are required",
                ))
            }
        };
        let credentials = Credentials::new(user, token);

        match self.transport {
            Some(transport) => Ok(GitHubAdminClient::with_transport(
                config,
                credentials,
                transport,
            )),
            None => GitHubAdminClient::new(config, credentials),
        }
    }
}

impl Default for GitHubAdminClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
