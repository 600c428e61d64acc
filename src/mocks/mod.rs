//! Mock transport and fixtures for testing code built on the client.

use crate::errors::{GitHubError, GitHubResult};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
    /// Headers.
    pub headers: HashMap<String, String>,
}

impl MockResponse {
    /// Creates a response with a raw body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: HashMap::new(),
        }
    }

    /// Creates a 200 response with a JSON body.
    pub fn ok<T: Serialize>(body: &T) -> Self {
        Self::new(200, serde_json::to_string(body).unwrap_or_default())
    }

    /// Creates a 201 Created response.
    pub fn created<T: Serialize>(body: &T) -> Self {
        Self::new(201, serde_json::to_string(body).unwrap_or_default())
    }

    /// Creates a 204 No Content response.
    pub fn no_content() -> Self {
        Self::new(204, "")
    }

    /// Creates a 404 response with a raw text body.
    pub fn not_found(body: &str) -> Self {
        Self::new(404, body)
    }

    /// Creates a 200 GraphQL response carrying an `errors` array.
    pub fn graphql_errors(messages: &[&str]) -> Self {
        let errors: Vec<_> = messages
            .iter()
            .map(|m| serde_json::json!({ "message": m }))
            .collect();
        Self::ok(&serde_json::json!({ "errors": errors }))
    }

    /// Creates a rate limit exceeded response.
    pub fn rate_limited() -> Self {
        let reset_at = Utc::now() + Duration::minutes(1);
        Self::new(403, "API rate limit exceeded").with_rate_limit(5000, 0, reset_at.timestamp())
    }

    /// Adds a header to the response.
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// Adds rate limit headers.
    pub fn with_rate_limit(mut self, limit: u32, remaining: u32, reset_timestamp: i64) -> Self {
        self.headers
            .insert("x-ratelimit-limit".to_string(), limit.to_string());
        self.headers
            .insert("x-ratelimit-remaining".to_string(), remaining.to_string());
        self.headers
            .insert("x-ratelimit-reset".to_string(), reset_timestamp.to_string());
        self
    }

    fn into_http(self) -> HttpResponse {
        HttpResponse {
            status: self.status,
            headers: self.headers,
            body: self.body.into(),
        }
    }
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// HTTP method.
    pub method: String,
    /// Full request URL.
    pub url: String,
    /// URL path.
    pub path: String,
    /// Raw query string.
    pub query: Option<String>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<String>,
    /// Timestamp.
    pub timestamp: DateTime<Utc>,
}

impl MockRequest {
    /// Parses the body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body.as_deref().and_then(|b| serde_json::from_str(b).ok())
    }
}

/// In-memory [`HttpTransport`].
///
/// Responses are queued per method and URL path and served in order. An
/// unmatched request gets a 404 with an explanatory body. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<RwLock<HashMap<String, VecDeque<MockResponse>>>>,
    requests: Arc<RwLock<Vec<MockRequest>>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for a given method and path.
    pub fn register(&self, method: &str, path: &str, response: MockResponse) {
        let key = format!("{}:{}", method.to_uppercase(), path);
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_default()
            .push_back(response);
    }

    /// Queues a GET response.
    pub fn on_get(&self, path: &str, response: MockResponse) {
        self.register("GET", path, response);
    }

    /// Queues a POST response.
    pub fn on_post(&self, path: &str, response: MockResponse) {
        self.register("POST", path, response);
    }

    /// Queues a PUT response.
    pub fn on_put(&self, path: &str, response: MockResponse) {
        self.register("PUT", path, response);
    }

    /// Queues a DELETE response.
    pub fn on_delete(&self, path: &str, response: MockResponse) {
        self.register("DELETE", path, response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Gets requests matching a method and exact path.
    pub fn requests_matching(&self, method: &str, path: &str) -> Vec<MockRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
            .collect()
    }

    /// Gets the count of requests made.
    pub fn request_count(&self) -> usize {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Checks that every queued response was consumed.
    pub fn all_consumed(&self) -> bool {
        self.responses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .all(VecDeque::is_empty)
    }

    /// Clears recorded requests and queued responses.
    pub fn reset(&self) {
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> GitHubResult<HttpResponse> {
        let parsed = url::Url::parse(&request.url).map_err(|e| {
            GitHubError::configuration(format!("Invalid request URL {}: {}", request.url, e))
        })?;
        let path = parsed.path().to_string();
        let method = request.method.as_str().to_uppercase();

        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MockRequest {
                method: method.clone(),
                url: request.url.clone(),
                path: path.clone(),
                query: parsed.query().map(String::from),
                headers: request.headers.clone(),
                body: request
                    .body
                    .as_ref()
                    .map(|b| String::from_utf8_lossy(b).into_owned()),
                timestamp: Utc::now(),
            });

        let key = format!("{}:{}", method, path);
        let response = self
            .responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        Ok(response
            .unwrap_or_else(|| {
                MockResponse::not_found(&format!("No mock response for {} {}", method, path))
            })
            .into_http())
    }
}

/// Test fixtures for common GitHub records.
pub mod fixtures {
    use serde_json::{json, Value};

    /// Creates a user record.
    pub fn user(login: &str) -> Value {
        json!({
            "login": login,
            "id": 1,
            "node_id": format!("U_{}", login),
            "type": "User",
            "site_admin": false
        })
    }

    /// Creates a repository record.
    pub fn repository(owner: &str, name: &str) -> Value {
        json!({
            "id": 1296269,
            "node_id": format!("R_{}_{}", owner, name),
            "name": name,
            "full_name": format!("{}/{}", owner, name),
            "private": true,
            "owner": user(owner),
            "default_branch": "main"
        })
    }

    /// Creates a team record.
    pub fn team(slug: &str) -> Value {
        json!({
            "id": 42,
            "node_id": format!("T_{}", slug),
            "slug": slug,
            "name": slug,
            "privacy": "closed",
            "permission": "pull"
        })
    }

    /// Creates a team discussion record.
    pub fn discussion(number: u64, title: &str) -> Value {
        json!({
            "number": number,
            "title": title,
            "body": title,
            "private": false
        })
    }

    /// Creates a branch protection rule node as returned by GraphQL.
    pub fn branch_protection_rule(id: &str, pattern: &str) -> Value {
        let empty = json!({ "totalCount": 0, "nodes": [] });
        json!({
            "id": id,
            "pattern": pattern,
            "isAdminEnforced": true,
            "allowsDeletions": false,
            "allowsForcePushes": false,
            "blocksCreations": false,
            "bypassForcePushAllowances": empty,
            "bypassPullRequestAllowances": empty,
            "pushAllowances": empty,
            "requiredApprovingReviewCount": 2,
            "requiredStatusCheckContexts": ["ci/build"],
            "requiredStatusChecks": [{ "context": "ci/build" }],
            "requiresApprovingReviews": true,
            "requiresCodeOwnerReviews": true,
            "requiresCommitSignatures": false,
            "requiresConversationResolution": true,
            "requiresStatusChecks": true,
            "requiresStrictStatusChecks": true,
            "restrictsPushes": false,
            "requiresLinearHistory": true,
            "restrictsReviewDismissals": false,
            "reviewDismissalAllowances": empty,
            "dismissesStaleReviews": false
        })
    }

    /// Creates an allowance connection over the given actor ids.
    pub fn allowances(actor_ids: &[&str]) -> Value {
        let nodes: Vec<_> = actor_ids
            .iter()
            .map(|id| json!({ "actor": { "id": id, "login": format!("login-{}", id) } }))
            .collect();
        json!({ "totalCount": actor_ids.len(), "nodes": nodes })
    }
}
