//! Integration tests using WireMock
//!
//! Each test starts its own mock server and points both the REST base URL and
//! the GraphQL endpoint at it.

pub mod branch_protection;
pub mod errors;
pub mod pagination;
pub mod rest;

use integrations_github_admin::GitHubAdminClient;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// base64("octocat:ghp_test")
pub const BASIC_AUTH: &str = "Basic b2N0b2NhdDpnaHBfdGVzdA==";
pub const TOKEN_AUTH: &str = "token ghp_test";
pub const GRAPHQL_PATH: &str = "/api/graphql";

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Builds a client whose REST and GraphQL endpoints both hit the mock server.
pub fn client_for(server: &MockServer) -> GitHubAdminClient {
    GitHubAdminClient::builder()
        .user("octocat")
        .token("ghp_test")
        .base_url(server.uri())
        .graphql_url(format!("{}{}", server.uri(), GRAPHQL_PATH))
        .build()
        .expect("Failed to build client")
}

/// A REST mock that only matches basic-auth requests.
pub fn rest_mock(method_matcher: &str, path_matcher: &str) -> MockBuilder {
    Mock::given(method(method_matcher))
        .and(path(path_matcher))
        .and(header("Authorization", BASIC_AUTH))
        .and(header("accept", "application/vnd.github.v3+json"))
}

/// A GraphQL mock that only matches token-auth requests.
pub fn graphql_mock() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("Authorization", TOKEN_AUTH))
}

/// Helper to create success response templates
pub fn success_response(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}
